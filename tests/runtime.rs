mod common;

#[cfg(test)]
mod runtime_tests {
    use pretty_assertions::assert_eq;

    use rox::runtime::{RunError, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};
    use rox::value::Value;

    use crate::common::{run, session};

    #[test]
    fn test_exit_codes() {
        let (_, syntax) = run("print ;");
        let (_, resolve) = run("return 1;");
        let (_, runtime) = run("print nope;");

        assert_eq!(syntax.map_err(|e| e.exit_code()), Err(EXIT_STATIC_ERROR));
        assert_eq!(resolve.map_err(|e| e.exit_code()), Err(EXIT_STATIC_ERROR));
        assert_eq!(runtime.map_err(|e| e.exit_code()), Err(EXIT_RUNTIME_ERROR));
    }

    #[test]
    fn test_static_errors_prevent_execution() {
        let (out, result) = run("print \"before\";\nreturn 2;");

        assert_eq!(out, "");
        assert!(matches!(result, Err(RunError::Static(_))));
    }

    #[test]
    fn test_lex_and_parse_errors_are_reported_together() {
        let (out, result) = run("print @;\nprint ;");

        assert_eq!(out, "");
        match result {
            Err(RunError::Static(diagnostics)) => assert_eq!(
                diagnostics.to_string(),
                "[line 1] Error: Unexpected character: @\n\
                 [line 1] Error at ';': Expected expression\n\
                 [line 2] Error at ';': Expected expression"
            ),
            other => panic!("expected static errors, got {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_expression() {
        let (mut runtime, _) = session();

        assert_eq!(runtime.evaluate("6 / 2").ok(), Some(Value::Number(3.0)));
        assert_eq!(runtime.evaluate("2 + 3 * 4").ok(), Some(Value::Number(14.0)));
        assert_eq!(
            runtime.evaluate("\"con\" + \"cat\"").ok(),
            Some(Value::String("concat".into()))
        );
        assert_eq!(runtime.evaluate("!nil").ok(), Some(Value::Bool(true)));
    }

    #[test]
    fn test_evaluate_errors() {
        let (mut runtime, _) = session();

        let syntax = runtime.evaluate("1 +").map_err(|e| e.to_string());
        assert_eq!(syntax, Err("[line 1] Error at end: Expected expression".to_string()));

        let runtime_error = runtime.evaluate("-true").map_err(|e| e.exit_code());
        assert_eq!(runtime_error, Err(EXIT_RUNTIME_ERROR));
    }

    #[test]
    fn test_session_state_persists_between_runs() {
        let (mut runtime, buffer) = session();

        runtime.run("var a = 1;").unwrap();
        runtime.run("fun add(x) { return a + x; }").unwrap();
        runtime.run("class K { get() { return add(10); } }").unwrap();
        runtime.run("print K().get();").unwrap();

        assert_eq!(buffer.contents(), "11\n");
        assert_eq!(runtime.evaluate("a + 1").ok(), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_errors_do_not_poison_the_session() {
        let (mut runtime, buffer) = session();

        assert!(runtime.run("print x;").is_err());
        assert!(runtime.run("var = ;").is_err());
        runtime.run("var x = 2; print x;").unwrap();

        assert_eq!(buffer.contents(), "2\n");
    }

    #[test]
    fn test_closures_from_earlier_runs_keep_their_bindings() {
        let (mut runtime, buffer) = session();

        runtime
            .run("fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }")
            .unwrap();
        runtime.run("var inc = make();").unwrap();
        runtime.run("inc();").unwrap();
        runtime.run("{ var n = 100; print inc(); }").unwrap();

        assert_eq!(buffer.contents(), "2\n");
    }

    #[test]
    fn test_globals_are_exposed() {
        let (mut runtime, _) = session();

        runtime.run("var answer = 42;").unwrap();

        let globals = runtime.interpreter().globals().clone();
        assert_eq!(globals.borrow().get_at(0, "answer"), Some(Value::Number(42.0)));
        assert!(globals.borrow().get_at(0, "clock").is_some());
    }

    /// Message of the runtime error a run must have stopped with.
    fn runtime_message(result: Result<(), RunError>) -> String {
        match result {
            Err(RunError::Runtime(e)) => e.to_string(),
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_block_scope_restored_after_runtime_error() {
        let (mut runtime, buffer) = session();

        assert_eq!(
            runtime_message(runtime.run("{ var leak = 1; print nope; }")),
            "Undefined variable 'nope'.\n[line 1]"
        );
        assert_eq!(
            runtime_message(runtime.run("print leak;")),
            "Undefined variable 'leak'.\n[line 1]"
        );

        runtime.run("var fine = \"ok\"; print fine;").unwrap();
        assert_eq!(buffer.contents(), "ok\n");
    }

    #[test]
    fn test_function_scope_restored_after_runtime_error() {
        let (mut runtime, buffer) = session();

        assert_eq!(
            runtime_message(runtime.run("fun f() { var inner = 1; print nope; }\nf();")),
            "Undefined variable 'nope'.\n[line 1]"
        );
        assert_eq!(
            runtime_message(runtime.run("print inner;")),
            "Undefined variable 'inner'.\n[line 1]"
        );

        runtime.run("var inner = 2; print inner; f = nil; print f;").unwrap();
        assert_eq!(buffer.contents(), "2\nnil\n");
    }
}
