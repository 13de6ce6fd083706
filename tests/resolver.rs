mod common;

#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;

    use rox::diagnostics::Diagnostics;
    use rox::resolver::{Locals, Resolver};

    use crate::common::parse;

    fn resolve(source: &str) -> Result<Locals, Diagnostics> {
        Resolver::new().resolve(&parse(source))
    }

    /// Resolved distances, in no particular binding order.
    fn distances(source: &str) -> Vec<usize> {
        let locals = match resolve(source) {
            Ok(locals) => locals,
            Err(diagnostics) => panic!("unexpected resolve errors:\n{}", diagnostics),
        };

        let mut distances: Vec<usize> = locals.into_values().collect();
        distances.sort_unstable();
        distances
    }

    fn errors(source: &str) -> Vec<String> {
        match resolve(source) {
            Ok(locals) => panic!("expected errors, resolved {:?}", locals),
            Err(diagnostics) => diagnostics.messages(),
        }
    }

    #[test]
    fn test_globals_are_not_recorded() {
        assert_eq!(distances("var a = 1; print a; a = 2;"), Vec::<usize>::new());
    }

    #[test]
    fn test_block_distances() {
        assert_eq!(distances("{ var a = 1; print a; { print a; } }"), vec![0, 1]);
    }

    #[test]
    fn test_parameters_and_closures() {
        assert_eq!(distances("fun f(x) { return x; }"), vec![0]);

        // `x` from the body of `inner` is one scope out; `inner` itself is local.
        assert_eq!(
            distances("fun outer() { var x = 1; fun inner() { x = x + 1; } return inner; }"),
            vec![0, 1, 1]
        );
    }

    #[test]
    fn test_this_and_super_distances() {
        // method body → this scope
        assert_eq!(distances("class A { m() { return this; } }"), vec![1]);

        // method body → this scope → super scope
        assert_eq!(
            distances("class A { m() {} } class B < A { m() { return super.m(); } }"),
            vec![2]
        );
    }

    #[test]
    fn test_global_redeclaration_is_allowed() {
        assert!(resolve("var a = 1; var a = 2;").is_ok());
    }

    #[test]
    fn test_bare_return_in_initializer_is_allowed() {
        assert!(resolve("class A { init() { return; } }").is_ok());
    }

    #[test]
    fn test_read_in_own_initializer() {
        assert_eq!(
            errors("{ var a = a; }"),
            vec!["Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_local_redeclaration() {
        assert_eq!(
            errors("fun f() { var a = 1; var a = 2; }"),
            vec!["Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_return_misuse() {
        assert_eq!(errors("return 1;"), vec!["Can't return from top-level code."]);
        assert_eq!(
            errors("class A { init() { return 1; } }"),
            vec!["Can't return a value from an initializer."]
        );
    }

    #[test]
    fn test_class_misuse() {
        assert_eq!(errors("class A < A {}"), vec!["A class can't inherit from itself."]);
        assert_eq!(errors("print this;"), vec!["Can't use 'this' outside of a class."]);
        assert_eq!(
            errors("fun f() { return super.m; }"),
            vec!["Can't use 'super' outside of a class."]
        );
        assert_eq!(
            errors("class A { m() { super.m(); } }"),
            vec!["Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_errors_accumulate_with_locations() {
        let diagnostics = match resolve("return 1;\n{ var b = b; }\nprint this;") {
            Ok(_) => panic!("expected errors"),
            Err(diagnostics) => diagnostics,
        };

        assert_eq!(
            diagnostics.to_string(),
            "[line 1] Error at 'return': Can't return from top-level code.\n\
             [line 2] Error at 'b': Can't read local variable in its own initializer.\n\
             [line 3] Error at 'this': Can't use 'this' outside of a class."
        );
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let program = parse("fun f(a) { { var b = a; return b; } } class C { m() { return this; } }");

        let first = Resolver::new().resolve(&program).map_err(|d| d.to_string());
        let second = Resolver::new().resolve(&program).map_err(|d| d.to_string());

        assert_eq!(first, second);
        assert_eq!(first.map(|locals| locals.len()), Ok(3));
    }
}
