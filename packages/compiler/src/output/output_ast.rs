//! Output AST Module
//!
//! Minimal JavaScript AST describing a render function that returns one
//! virtual-node tree built through a helper call.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayExpression {
    pub elements: Vec<JsNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallExpression {
    pub callee: Identifier,
    pub arguments: Vec<JsNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnStatement {
    #[serde(rename = "return")]
    pub argument: Box<JsNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDecl {
    pub id: Identifier,
    pub params: Vec<Identifier>,
    pub body: Vec<JsNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum JsNode {
    FunctionDecl(FunctionDecl),
    Identifier(Identifier),
    StringLiteral(StringLiteral),
    ArrayExpression(ArrayExpression),
    CallExpression(CallExpression),
    ReturnStatement(ReturnStatement),
}

impl JsNode {
    pub fn visit<V: JsVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            JsNode::FunctionDecl(f) => visitor.visit_function_decl(f),
            JsNode::Identifier(i) => visitor.visit_identifier(i),
            JsNode::StringLiteral(s) => visitor.visit_string_literal(s),
            JsNode::ArrayExpression(a) => visitor.visit_array_expression(a),
            JsNode::CallExpression(c) => visitor.visit_call_expression(c),
            JsNode::ReturnStatement(r) => visitor.visit_return_statement(r),
        }
    }

    pub fn as_function_decl(&self) -> Option<&FunctionDecl> {
        match self {
            JsNode::FunctionDecl(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_call_expression(&self) -> Option<&CallExpression> {
        match self {
            JsNode::CallExpression(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_array_expression(&self) -> Option<&ArrayExpression> {
        match self {
            JsNode::ArrayExpression(a) => Some(a),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub trait JsVisitor {
    type Output;

    fn visit_function_decl(&mut self, decl: &FunctionDecl) -> Self::Output;
    fn visit_identifier(&mut self, ident: &Identifier) -> Self::Output;
    fn visit_string_literal(&mut self, lit: &StringLiteral) -> Self::Output;
    fn visit_array_expression(&mut self, array: &ArrayExpression) -> Self::Output;
    fn visit_call_expression(&mut self, call: &CallExpression) -> Self::Output;
    fn visit_return_statement(&mut self, stmt: &ReturnStatement) -> Self::Output;
}

// Builders

pub fn identifier(name: impl Into<String>) -> JsNode {
    JsNode::Identifier(Identifier::new(name))
}

pub fn string_literal(value: impl Into<String>) -> JsNode {
    JsNode::StringLiteral(StringLiteral {
        value: value.into(),
    })
}

pub fn array_expression(elements: Vec<JsNode>) -> JsNode {
    JsNode::ArrayExpression(ArrayExpression { elements })
}

pub fn call_expression(callee: impl Into<String>, arguments: Vec<JsNode>) -> JsNode {
    JsNode::CallExpression(CallExpression {
        callee: Identifier::new(callee),
        arguments,
    })
}

pub fn return_statement(argument: JsNode) -> JsNode {
    JsNode::ReturnStatement(ReturnStatement {
        argument: Box::new(argument),
    })
}

pub fn function_decl(name: impl Into<String>, params: Vec<Identifier>, body: Vec<JsNode>) -> JsNode {
    JsNode::FunctionDecl(FunctionDecl {
        id: Identifier::new(name),
        params,
        body,
    })
}
