#[cfg(test)]
mod tests {
    use crate::script::document::{
        Callable, Code, Comment, Constant, Document, Spacer, TextTree, Variable,
    };
    use crate::transpiler::defaults::{Defaults, Options};
    use crate::transpiler::diagnostics::Diagnostics;
    use crate::transpiler::errors::Diagnostic;
    use crate::transpiler::preprocess::{
        CallableKind, ClassificationStrategy, Preprocessor, ReturnStatementHeuristic,
        classify_callables, lower_tooltips, synthesize_constants,
    };
    use anyhow::Result;
    use serde_json::json;

    fn speed_variable() -> Variable {
        Variable {
            type_hint: Some("float".to_string()),
            value: Some("5.0".to_string()),
            generate_default: true,
            ..Variable::new("speed")
        }
    }

    #[test]
    fn test_constant_synthesis_is_idempotent() {
        let options = Options::default();
        let mut document = Document {
            variables: vec![speed_variable()],
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::new();

        assert_eq!(synthesize_constants(&mut document, &options.constant, &mut diagnostics), 1);
        assert_eq!(synthesize_constants(&mut document, &options.constant, &mut diagnostics), 0);

        assert_eq!(document.constants.len(), 1);
        let constant = &document.constants[0];
        assert_eq!(constant.declared_name().map(str::to_uppercase).as_deref(), Some("DEFAULT_SPEED"));
        assert_eq!(constant.type_hint.as_deref(), Some("float"));
        assert_eq!(constant.value.as_deref(), Some("5.0"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_existing_constant_wins_over_synthesized_one() {
        let options = Options::default();
        let mut document = Document {
            constants: vec![Constant::new("DEFAULT_SPEED", None, Some("9.0".to_string()))],
            variables: vec![speed_variable()],
            ..Default::default()
        };

        synthesize_constants(&mut document, &options.constant, &mut Diagnostics::new());

        assert_eq!(document.constants.len(), 1);
        assert_eq!(document.constants[0].value.as_deref(), Some("9.0"));
    }

    #[test]
    fn test_synthesis_uses_configured_prefix_and_suffix() -> Result<()> {
        let mut defaults = Defaults::builtin();
        defaults.merge(&json!({"constant": {"constant_prefix": "INIT_", "constant_suffix": "_V"}}))?;
        let options = Options::resolve(&defaults, &mut Diagnostics::new());
        let mut document = Document {
            variables: vec![speed_variable()],
            ..Default::default()
        };

        synthesize_constants(&mut document, &options.constant, &mut Diagnostics::new());

        assert_eq!(document.constants[0].name.as_deref(), Some("INIT_speed_V"));
        Ok(())
    }

    #[test]
    fn test_synthesis_without_value_is_reported() {
        let options = Options::default();
        let mut document = Document {
            variables: vec![Variable {
                generate_default: true,
                ..Variable::new("target")
            }],
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::new();

        synthesize_constants(&mut document, &options.constant, &mut diagnostics);

        assert!(document.constants.is_empty());
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::MissingDefaultValue {
                variable: "target".to_string()
            }]
        );
    }

    #[test]
    fn test_tooltip_lowering_for_exported_variable() {
        let options = Options::default();
        let mut document = Document {
            variables: vec![Variable {
                export: true,
                tooltip: Some(TextTree::Nested(vec!["Health".into(), "Points".into()])),
                ..Variable::new("hp")
            }],
            ..Default::default()
        };

        lower_tooltips(&mut document, &options.comment);

        let variable = &document.variables[0];
        assert_eq!(
            variable.comments,
            vec![
                Comment::marked("## ", 0, "Health"),
                Comment::marked("## ", 0, "Points"),
            ]
        );
        assert!(variable.tooltip.is_none());
    }

    #[test]
    fn test_tooltip_lowering_appends_plain_comments() {
        let options = Options::default();
        let mut document = Document {
            variables: vec![Variable {
                comments: vec![Comment::plain("existing")],
                tooltip: Some(TextTree::Nested(vec![
                    "a".into(),
                    TextTree::Nested(vec!["b".into()]),
                ])),
                ..Variable::new("hidden")
            }],
            constants: vec![Constant {
                tooltip: Some("limit".into()),
                ..Constant::new("max", None, Some("3".to_string()))
            }],
            ..Default::default()
        };

        lower_tooltips(&mut document, &options.comment);

        assert_eq!(
            document.variables[0].comments,
            vec![
                Comment::plain("existing"),
                Comment::marked("# ", 0, "a"),
                Comment::marked("# ", 0, "b"),
            ]
        );
        assert_eq!(document.constants[0].comments, vec![Comment::marked("# ", 0, "limit")]);
        assert!(document.constants[0].tooltip.is_none());
    }

    fn callables() -> Vec<Callable> {
        vec![
            Callable::new("get_speed").with_code(["var s = speed * 2", "return s"]),
            Callable::new("_ready").with_code(["print(\"ready\")"]),
            Callable {
                return_type: Some("void".to_string()),
                ..Callable::new("reset").with_code(["return result"])
            },
            Callable {
                return_type: Some("int".to_string()),
                ..Callable::new("count")
            },
            Callable::new("sum").with_code(["return a + b"]),
            Callable::default(),
        ]
    }

    #[test]
    fn test_classification_rules() {
        let options = Options::default();
        let mut document = Document {
            functions: callables(),
            ..Default::default()
        };

        classify_callables(&mut document, &ReturnStatementHeuristic, &options.callable);

        let names = |list: &[Callable]| -> Vec<Option<String>> {
            list.iter().map(|c| c.name.clone()).collect()
        };
        assert_eq!(
            names(&document.functions),
            vec![Some("get_speed".to_string()), Some("count".to_string())]
        );
        assert_eq!(
            names(&document.methods),
            vec![
                Some("_ready".to_string()),
                Some("reset".to_string()),
                Some("sum".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_classification_is_total_and_repeatable() {
        let options = Options::default();
        let input = callables();
        let mut document = Document {
            functions: input.clone(),
            ..Default::default()
        };

        classify_callables(&mut document, &ReturnStatementHeuristic, &options.callable);
        let first = (document.functions.len(), document.methods.len());
        classify_callables(&mut document, &ReturnStatementHeuristic, &options.callable);

        assert_eq!(document.functions.len() + document.methods.len(), input.len());
        assert_eq!((document.functions.len(), document.methods.len()), first);
        for original in &input {
            let in_functions = document.functions.iter().filter(|c| c.name == original.name).count();
            let in_methods = document.methods.iter().filter(|c| c.name == original.name).count();
            assert_eq!(in_functions + in_methods, 1, "{:?}", original.name);
        }
    }

    #[test]
    fn test_bodies_are_indented_or_placeholder() {
        let options = Options::default();
        let mut document = Document {
            functions: vec![
                Callable::new("a").with_code(["x += 1", "return x"]),
                Callable {
                    code: Code::Block("one()\ntwo()".to_string()),
                    ..Callable::new("b")
                },
                Callable::new("c"),
            ],
            ..Default::default()
        };

        classify_callables(&mut document, &ReturnStatementHeuristic, &options.callable);

        assert_eq!(document.functions[0].body.as_deref(), Some("\tx += 1\n\treturn x"));
        assert_eq!(document.methods[0].body.as_deref(), Some("\tone()\n\ttwo()"));
        assert_eq!(document.methods[1].body.as_deref(), Some("\tpass"));
    }

    struct EverythingIsAFunction;

    impl ClassificationStrategy for EverythingIsAFunction {
        fn classify(&self, _callable: &Callable) -> CallableKind {
            CallableKind::Function
        }
    }

    #[test]
    fn test_classification_strategy_is_swappable() {
        let options = Options::default();
        let mut document = Document {
            functions: callables(),
            ..Default::default()
        };

        Preprocessor::new(&options)
            .with_strategy(EverythingIsAFunction)
            .run(&mut document, &mut Diagnostics::new());

        assert_eq!(document.functions.len(), callables().len() - 1);
        assert!(document.functions.iter().any(|c| c.name.as_deref() == Some("sum")));
        assert_eq!(document.methods.len(), 1);
        assert_eq!(document.methods[0].name.as_deref(), Some("reset"));
    }

    #[test]
    fn test_spacers_follow_the_preceding_callable() {
        let options = Options::default();
        let mut document = Document {
            functions: vec![
                Callable::spacer(),
                Callable::new("get_hp").with_code(["return hp"]),
                Callable::spacer(),
                Callable::new("_ready"),
                Callable::spacer(),
            ],
            ..Default::default()
        };

        classify_callables(&mut document, &ReturnStatementHeuristic, &options.callable);
        let first = document.clone();
        classify_callables(&mut document, &ReturnStatementHeuristic, &options.callable);

        let spacers = |list: &[Callable]| -> Vec<bool> { list.iter().map(|c| c.spacer).collect() };
        assert_eq!(spacers(&document.functions), vec![true, false, true]);
        assert_eq!(spacers(&document.methods), vec![false, true]);
        assert!(document.functions[0].body.is_none());
        assert_eq!(document, first);
    }

    #[test]
    fn test_blank_value_is_not_synthesized() {
        let options = Options::default();
        let mut document = Document {
            variables: vec![Variable {
                value: Some(String::new()),
                generate_default: true,
                ..Variable::new("w")
            }],
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::new();

        assert_eq!(synthesize_constants(&mut document, &options.constant, &mut diagnostics), 0);

        assert!(document.constants.is_empty());
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::MissingDefaultValue {
                variable: "w".to_string()
            }]
        );
    }

    #[test]
    fn test_pipeline_applies_entity_defaults_first() -> Result<()> {
        let mut defaults = Defaults::builtin();
        defaults.merge(&json!({
            "export_variable": true,
            "generate_constant": true,
            "function": {"return_type": "void", "parameters": ["delta"]},
        }))?;
        let options = Options::resolve(&defaults, &mut Diagnostics::new());
        let mut document = Document {
            variables: vec![Variable {
                value: Some("1".to_string()),
                tooltip: Some("Lives".into()),
                ..Variable::new("lives")
            }],
            functions: vec![Callable::new("tick").with_code(["return lives"])],
            ..Default::default()
        };

        Preprocessor::new(&options).run(&mut document, &mut Diagnostics::new());

        let variable = &document.variables[0];
        assert!(variable.export);
        assert!(variable.generate_default);
        assert_eq!(variable.comments, vec![Comment::marked("## ", 0, "Lives")]);
        assert_eq!(document.constants[0].name.as_deref(), Some("DEFAULT_lives"));
        assert!(document.functions.is_empty());
        assert_eq!(document.methods[0].parameters, vec!["delta"]);
        Ok(())
    }
}
