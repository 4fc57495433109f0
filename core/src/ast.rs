//! AST node shapes the compiler walks (§3, §4.D).
//!
//! This crate has no lexer or parser: it's handed a tree built by a caller
//! (or, in tests, by [`test_support`]'s builders) and only needs a *shape*
//! stable enough to grow bytecode from deterministically.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    IntegerLiteral(i64),
    StringLiteral(String),
    BooleanLiteral(bool),
    ArrayLiteral(Vec<Expression>),
    HashLiteral(Vec<(Expression, Expression)>),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Index(IndexExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub operator: String,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub name: Option<String>,
    pub parameters: Vec<String>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

/// A textual rendering used only to order `HashLiteral` keys deterministically
/// (§4.D "ascending order by the source textual form of the key expression").
/// Not meant to round-trip to parseable source.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{name}"),
            Expression::IntegerLiteral(value) => write!(f, "{value}"),
            Expression::StringLiteral(value) => write!(f, "{value:?}"),
            Expression::BooleanLiteral(value) => write!(f, "{value}"),
            Expression::ArrayLiteral(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Expression::HashLiteral(pairs) => {
                let items: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            Expression::Prefix(p) => write!(f, "({}{})", p.operator, p.right),
            Expression::Infix(i) => write!(f, "({} {} {})", i.left, i.operator, i.right),
            Expression::If(_) => write!(f, "<if>"),
            Expression::Index(i) => write!(f, "({}[{}])", i.left, i.index),
            Expression::Function(func) => {
                write!(f, "fn({})", func.parameters.join(", "))
            }
            Expression::Call(c) => {
                let args: Vec<String> = c.arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", c.function, args.join(", "))
            }
        }
    }
}

/// Hand-built AST fragments for tests, replacing a lexer/parser (§10.E).
pub mod test_support {
    use super::*;

    pub fn program(statements: Vec<Statement>) -> Program {
        Program { statements }
    }

    pub fn let_stmt(name: &str, value: Expression) -> Statement {
        Statement::Let(LetStatement {
            name: name.to_string(),
            value,
        })
    }

    pub fn return_stmt(value: Expression) -> Statement {
        Statement::Return(ReturnStatement { value })
    }

    pub fn expr_stmt(expression: Expression) -> Statement {
        Statement::Expression(ExpressionStatement { expression })
    }

    pub fn block(statements: Vec<Statement>) -> BlockStatement {
        BlockStatement { statements }
    }

    pub fn ident(name: &str) -> Expression {
        Expression::Identifier(name.to_string())
    }

    pub fn int(value: i64) -> Expression {
        Expression::IntegerLiteral(value)
    }

    pub fn string(value: &str) -> Expression {
        Expression::StringLiteral(value.to_string())
    }

    pub fn boolean(value: bool) -> Expression {
        Expression::BooleanLiteral(value)
    }

    pub fn array(elements: Vec<Expression>) -> Expression {
        Expression::ArrayLiteral(elements)
    }

    pub fn hash(pairs: Vec<(Expression, Expression)>) -> Expression {
        Expression::HashLiteral(pairs)
    }

    pub fn prefix(operator: &str, right: Expression) -> Expression {
        Expression::Prefix(PrefixExpression {
            operator: operator.to_string(),
            right: Box::new(right),
        })
    }

    pub fn infix(operator: &str, left: Expression, right: Expression) -> Expression {
        Expression::Infix(InfixExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn if_expr(
        condition: Expression,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    ) -> Expression {
        Expression::If(IfExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    pub fn index(left: Expression, index: Expression) -> Expression {
        Expression::Index(IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    pub fn function(name: Option<&str>, parameters: &[&str], body: BlockStatement) -> Expression {
        Expression::Function(FunctionLiteral {
            name: name.map(|n| n.to_string()),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            body,
        })
    }

    pub fn call(function: Expression, arguments: Vec<Expression>) -> Expression {
        Expression::Call(CallExpression {
            function: Box::new(function),
            arguments,
        })
    }
}

#[cfg(test)]
mod ast_test;
