//! Built-in Godot rename tables.
//!
//! Order inside a table matters. Longer tokens come before tokens they contain
//! (`KinematicBody2D` before `KinematicBody`), and some rules match the output
//! of an earlier rule (`event.type == InputEventKey` only exists once
//! `InputEvent.KEY` has been renamed).

use crate::transpiler::migration::RenameTable;
use once_cell::sync::Lazy;

const GODOT_2_TO_3: &[(&str, &str)] = &[
    ("set_fixed_process(", "set_physics_process("),
    ("_fixed_process(", "_physics_process("),
    ("get_global_pos()", "get_global_position()"),
    ("set_global_pos(", "set_global_position("),
    ("get_pos()", "get_position()"),
    ("set_pos(", "set_position("),
    ("get_rot()", "get_rotation()"),
    ("set_rot(", "set_rotation("),
    ("InputEvent.MOUSE_BUTTON", "InputEventMouseButton"),
    ("InputEvent.MOUSE_MOTION", "InputEventMouseMotion"),
    ("InputEvent.KEY", "InputEventKey"),
    ("event.type == InputEventMouseButton", "event is InputEventMouseButton"),
    ("event.type == InputEventMouseMotion", "event is InputEventMouseMotion"),
    ("event.type == InputEventKey", "event is InputEventKey"),
    ("SamplePlayer2D", "AudioStreamPlayer2D"),
    ("SamplePlayer", "AudioStreamPlayer"),
    ("TestCube", "MeshInstance"),
    ("Matrix32", "Transform2D"),
    ("Matrix3", "Basis"),
    ("RawArray", "PoolByteArray"),
    ("IntArray", "PoolIntArray"),
    ("RealArray", "PoolRealArray"),
    ("StringArray", "PoolStringArray"),
    ("Vector2Array", "PoolVector2Array"),
    ("Vector3Array", "PoolVector3Array"),
    ("ColorArray", "PoolColorArray"),
];

const GODOT_3_TO_4: &[(&str, &str)] = &[
    ("KinematicBody2D", "CharacterBody2D"),
    ("KinematicBody", "CharacterBody3D"),
    ("SpatialMaterial", "StandardMaterial3D"),
    ("Spatial", "Node3D"),
    ("PoolByteArray", "PackedByteArray"),
    ("PoolIntArray", "PackedInt32Array"),
    ("PoolRealArray", "PackedFloat32Array"),
    ("PoolStringArray", "PackedStringArray"),
    ("PoolVector2Array", "PackedVector2Array"),
    ("PoolVector3Array", "PackedVector3Array"),
    ("PoolColorArray", "PackedColorArray"),
    ("Transform(", "Transform3D("),
    ("onready var", "@onready var"),
    ("export var", "@export var"),
    ("yield(get_tree(), \"idle_frame\")", "await get_tree().process_frame"),
    (".instance()", ".instantiate()"),
    (".empty()", ".is_empty()"),
    ("rand_range(", "randf_range("),
    ("stepify(", "snapped("),
    ("deg2rad(", "deg_to_rad("),
    ("rad2deg(", "rad_to_deg("),
    ("str2var(", "str_to_var("),
    ("var2str(", "var_to_str("),
    ("funcref(", "Callable("),
    ("OS.get_ticks_msec()", "Time.get_ticks_msec()"),
    ("change_scene(", "change_scene_to_file("),
    ("is_network_master()", "is_multiplayer_authority()"),
    ("BUTTON_LEFT", "MOUSE_BUTTON_LEFT"),
    ("BUTTON_RIGHT", "MOUSE_BUTTON_RIGHT"),
];

pub static GODOT_TABLES: Lazy<Vec<RenameTable>> = Lazy::new(|| {
    vec![
        RenameTable::new(2, 3, GODOT_2_TO_3.iter().copied()),
        RenameTable::new(3, 4, GODOT_3_TO_4.iter().copied()),
    ]
});
