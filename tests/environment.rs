#[cfg(test)]
mod environment_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use rox::environment::{EnvRef, Environment};
    use rox::token::{Token, TokenType};
    use rox::value::Value;

    fn name(lexeme: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, lexeme, 7)
    }

    fn globals() -> EnvRef {
        Rc::new(RefCell::new(Environment::new()))
    }

    #[test]
    fn test_define_then_get() {
        let env = globals();
        env.borrow_mut().define("a", Value::Number(1.0));

        assert_eq!(env.borrow().get(&name("a")).ok(), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_redefinition_overwrites() {
        let env = globals();
        env.borrow_mut().define("a", Value::Number(1.0));
        env.borrow_mut().define("a", Value::String("two".into()));

        assert_eq!(
            env.borrow().get(&name("a")).ok(),
            Some(Value::String("two".into()))
        );
    }

    #[test]
    fn test_undefined_variable_reports_name_and_line() {
        let env = globals();

        let err = env.borrow().get(&name("missing")).unwrap_err();

        assert_eq!(err.to_string(), "Undefined variable 'missing'.\n[line 7]");
    }

    #[test]
    fn test_child_shadows_and_falls_through() {
        let outer = globals();
        outer.borrow_mut().define("a", Value::String("outer".into()));
        outer.borrow_mut().define("b", Value::Bool(true));

        let inner = Environment::child_of(&outer);
        inner.borrow_mut().define("a", Value::String("inner".into()));

        assert_eq!(
            inner.borrow().get(&name("a")).ok(),
            Some(Value::String("inner".into()))
        );
        assert_eq!(inner.borrow().get(&name("b")).ok(), Some(Value::Bool(true)));
        assert_eq!(
            outer.borrow().get(&name("a")).ok(),
            Some(Value::String("outer".into()))
        );
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let outer = globals();
        outer.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::child_of(&outer);

        inner
            .borrow_mut()
            .assign(&name("a"), Value::Number(2.0))
            .unwrap();

        assert_eq!(outer.borrow().get(&name("a")).ok(), Some(Value::Number(2.0)));
        assert_eq!(inner.borrow().get_at(0, "a"), None);
    }

    #[test]
    fn test_assign_never_creates() {
        let env = globals();

        let err = env
            .borrow_mut()
            .assign(&name("ghost"), Value::Nil)
            .unwrap_err();

        assert_eq!(err.message(), "Undefined variable 'ghost'.");
        assert!(env.borrow().get(&name("ghost")).is_err());
    }

    #[test]
    fn test_get_at_and_assign_at_skip_searching() {
        let global = globals();
        global.borrow_mut().define("x", Value::Number(0.0));

        let middle = Environment::child_of(&global);
        middle.borrow_mut().define("x", Value::Number(1.0));

        let inner = Environment::child_of(&middle);
        inner.borrow_mut().define("x", Value::Number(2.0));

        assert_eq!(inner.borrow().get_at(0, "x"), Some(Value::Number(2.0)));
        assert_eq!(inner.borrow().get_at(1, "x"), Some(Value::Number(1.0)));
        assert_eq!(inner.borrow().get_at(2, "x"), Some(Value::Number(0.0)));
        assert_eq!(inner.borrow().get_at(3, "x"), None);

        assert!(inner.borrow_mut().assign_at(2, "x", Value::Number(10.0)));
        assert_eq!(global.borrow().get_at(0, "x"), Some(Value::Number(10.0)));
        assert_eq!(middle.borrow().get_at(0, "x"), Some(Value::Number(1.0)));

        assert!(!inner.borrow_mut().assign_at(3, "x", Value::Nil));
    }

    #[test]
    fn test_depth() {
        let global = globals();
        let child = Environment::child_of(&global);
        let grandchild = Environment::child_of(&child);

        assert_eq!(global.borrow().depth(), 0);
        assert_eq!(grandchild.borrow().depth(), 2);
        assert!(grandchild.borrow().enclosing().is_some());
        assert!(global.borrow().enclosing().is_none());
    }
}
