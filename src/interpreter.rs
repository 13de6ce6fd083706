use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info};

use crate::callable::{Callable, LoxFunction, NativeFunction};
use crate::class::{LoxClass, LoxInstance, INITIALIZER};
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::expr::{Expr, ExprId};
use crate::resolver::Locals;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Deepest chain of nested calls before a run is stopped with
/// "Stack overflow.".  Threads driving a [`Runtime`](crate::runtime::Runtime)
/// need [`STACK_SIZE`](crate::runtime::STACK_SIZE) of native stack to reach it.
pub const MAX_CALL_DEPTH: usize = 8192;

/// How a statement finished.  `Return` unwinds to the nearest function call,
/// which is the only place that absorbs it.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Tree‑walking evaluator.  One instance lives for the whole session so that
/// globals (and closures over them) survive between REPL lines.
pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    locals: HashMap<ExprId, usize>,
    call_depth: usize,
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a new Interpreter printing to stdout, with the native
    /// functions (`clock`) defined.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Same as [`Interpreter::new`] but `print` writes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Rc::new(std::cell::RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");
        globals
            .borrow_mut()
            .define("clock", Value::from(NativeFunction::clock()));

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            call_depth: 0,
            out,
        }
    }

    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    /// Merges a resolution table produced by the resolver.
    ///
    /// Entries stay for the whole session: a function declared on one REPL
    /// line may run on any later one.
    pub fn resolve(&mut self, locals: Locals) {
        debug!("Recording {} resolved local(s)", locals.len());
        self.locals.extend(locals);
    }

    /// Interprets a list of statements (a "program").  Stops at the first
    /// runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            if let Flow::Return(_) = self.execute(stmt)? {
                // Rejected by the resolver; nothing left to return to.
                break;
            }
        }

        self.out.flush()?;
        info!("Interpretation completed successfully");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let env = Environment::child_of(&self.environment);
                self.execute_block(statements, env)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);
                let function = LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                self.environment
                    .borrow_mut()
                    .define(&decl.name.lexeme, Value::from(function));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                self.declare_class(name, superclass.as_ref(), methods)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Runs `statements` with `env` as the current scope, restoring the
    /// previous scope on every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], env: EnvRef) -> Result<Flow> {
        let previous = std::mem::replace(&mut self.environment, env);
        debug!("Entering block at depth {}", self.environment.borrow().depth());

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn declare_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<()> {
        debug!("Declaring class '{}'", name.lexeme);

        let superclass: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Callable(Callable::Class(class)) => Some(class),
                _ => {
                    let token = match expr {
                        Expr::Variable { name, .. } => name,
                        _ => name,
                    };
                    return Err(LoxError::runtime(token, "Superclass must be a class."));
                }
            },
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Nil);

        // Methods close over a scope holding `super` when there is a superclass.
        let method_env: EnvRef = match &superclass {
            Some(class) => {
                let env = Environment::child_of(&self.environment);
                env.borrow_mut()
                    .define("super", Value::from(Rc::clone(class)));
                env
            }
            None => Rc::clone(&self.environment),
        };

        let methods: HashMap<String, Rc<LoxFunction>> = methods
            .iter()
            .map(|decl| {
                let is_initializer = decl.name.lexeme == INITIALIZER;
                let function =
                    LoxFunction::new(Rc::clone(decl), Rc::clone(&method_env), is_initializer);
                (decl.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        let class = Rc::new(LoxClass::new(name.lexeme.clone(), superclass, methods));
        self.environment
            .borrow_mut()
            .assign(name, Value::from(class))?;

        info!("Class '{}' defined", name.lexeme);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal)),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                self.assign_variable(*id, name, value.clone())?;
                Ok(value)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let short_circuit = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }

                self.invoke_callable(callee, paren, args)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                _ => Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime(name, "Only instances have fields."));
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());
                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    /// Evaluates a unary expression.
    fn evaluate_unary(&mut self, op: &Token, expr: &Expr) -> Result<Value> {
        let right = self.evaluate(expr)?;

        match op.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(LoxError::runtime(
                    op,
                    format!("Operand of '{}' must be a number.", op.lexeme),
                )),
            },
            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
            _ => Err(LoxError::runtime(
                op,
                format!("Invalid unary operator '{}'.", op.lexeme),
            )),
        }
    }

    /// Evaluates a binary expression.  Both operands are evaluated, left first.
    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match op.token_type {
            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => Err(LoxError::runtime(
                    op,
                    "Operands of '+' must be two numbers or two strings.",
                )),
            },
            TokenType::MINUS => numbers(op, &left, &right).map(|(a, b)| Value::Number(a - b)),
            TokenType::STAR => numbers(op, &left, &right).map(|(a, b)| Value::Number(a * b)),
            TokenType::SLASH => numbers(op, &left, &right).map(|(a, b)| Value::Number(a / b)),
            TokenType::GREATER => numbers(op, &left, &right).map(|(a, b)| Value::Bool(a > b)),
            TokenType::GREATER_EQUAL => {
                numbers(op, &left, &right).map(|(a, b)| Value::Bool(a >= b))
            }
            TokenType::LESS => numbers(op, &left, &right).map(|(a, b)| Value::Bool(a < b)),
            TokenType::LESS_EQUAL => numbers(op, &left, &right).map(|(a, b)| Value::Bool(a <= b)),
            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left == right)),
            TokenType::BANG_EQUAL => Ok(Value::Bool(left != right)),
            _ => Err(LoxError::runtime(
                op,
                format!("Invalid binary operator '{}'.", op.lexeme),
            )),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance = *self
            .locals
            .get(&id)
            .ok_or_else(|| unresolved(keyword))?;

        let (superclass, object) = {
            let env = self.environment.borrow();
            let superclass = env.get_at(distance, "super");
            // `this` lives in the scope just inside the one holding `super`.
            let object = distance
                .checked_sub(1)
                .and_then(|d| env.get_at(d, "this"));
            (superclass, object)
        };

        let (Some(Value::Callable(Callable::Class(superclass))), Some(Value::Instance(object))) =
            (superclass, object)
        else {
            return Err(unresolved(keyword));
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::from(found.bind(&object))),
            None => Err(LoxError::runtime(
                method,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => self
                .environment
                .borrow()
                .get_at(distance, &name.lexeme)
                .ok_or_else(|| unresolved(name)),
            None => self.globals.borrow().get(name),
        }
    }

    fn assign_variable(&mut self, id: ExprId, name: &Token, value: Value) -> Result<()> {
        match self.locals.get(&id) {
            Some(&distance) => {
                if self
                    .environment
                    .borrow_mut()
                    .assign_at(distance, &name.lexeme, value)
                {
                    Ok(())
                } else {
                    Err(unresolved(name))
                }
            }
            None => self.globals.borrow_mut().assign(name, value),
        }
    }

    /// Checks the callee and arity, then dispatches.
    fn invoke_callable(&mut self, callee: Value, paren: &Token, args: Vec<Value>) -> Result<Value> {
        let Value::Callable(callable) = callee else {
            return Err(LoxError::runtime(
                paren,
                "Can only call functions and classes.",
            ));
        };

        if args.len() != callable.arity() {
            return Err(LoxError::runtime(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    args.len()
                ),
            ));
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(LoxError::runtime(paren, "Stack overflow."));
        }

        self.call_depth += 1;
        let result = callable.call(self, args, paren);
        self.call_depth -= 1;

        let result = result?;
        debug!("Call to {} returned: {}", callable, result);
        Ok(result)
    }
}

/// Both operands of an arithmetic/comparison operator must be numbers.
fn numbers(op: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(LoxError::runtime(
            op,
            format!("Operands of '{}' must be numbers.", op.lexeme),
        )),
    }
}

/// The resolver promised a binding that the scope chain does not have.
fn unresolved(name: &Token) -> LoxError {
    LoxError::runtime(
        name,
        format!("Unresolved binding for '{}'.", name.lexeme),
    )
}
