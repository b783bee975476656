//! The closed set of parse-tree node kinds.
//!
//! Every kind maps to exactly one layout strategy in the formatter; the
//! dispatch match over this enum is exhaustive, so adding a kind forces an
//! explicit layout decision.

use std::fmt;

/// Kind tag for a parse-tree node.
///
/// Leaf kinds (`Ident`, `Literal`, `Modifier`, `TypeRef`, `CaseLabel`) carry
/// their token text on the node; interior kinds own children in
/// first-child/next-sibling order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum NodeKind {
    // File structure
    File,
    Package,
    Import,

    // Type declarations
    Class,
    Interface,
    Enum,
    Annotation,
    TypeBody,
    EnumBody,
    AnonClassBody,
    EnumConstant,

    // Members
    Method,
    Constructor,
    Field,
    StaticInit,
    InstanceInit,
    Modifiers,
    Modifier,
    TypeRef,
    ParamList,
    Param,
    Throws,

    // Statements
    Block,
    EmptyStmt,
    ExprStmt,
    LocalVar,
    If,
    For,
    ForInit,
    ForCond,
    ForUpdate,
    While,
    DoWhile,
    Switch,
    CaseGroup,
    CaseLabel,
    Try,
    Catch,
    Finally,
    Sync,
    Return,
    Break,
    Continue,
    Throw,
    Label,

    // Expressions
    Assign,
    Ternary,
    Binary,
    Unary,
    Call,
    ArgList,
    Select,
    New,
    ArrayInit,
    Paren,
    Cast,
    Ident,
    Literal,
}

impl NodeKind {
    /// Check if this kind is a type declaration (class-like).
    #[inline]
    pub fn is_type_decl(self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Interface | NodeKind::Enum | NodeKind::Annotation
        )
    }

    /// Check if this kind is a type-body member declaration.
    #[inline]
    pub fn is_member(self) -> bool {
        matches!(
            self,
            NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::Field
                | NodeKind::StaticInit
                | NodeKind::InstanceInit
                | NodeKind::EnumConstant
        ) || self.is_type_decl()
    }

    /// Check if this kind is a statement.
    #[inline]
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Block
                | NodeKind::EmptyStmt
                | NodeKind::ExprStmt
                | NodeKind::LocalVar
                | NodeKind::If
                | NodeKind::For
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::Switch
                | NodeKind::Try
                | NodeKind::Sync
                | NodeKind::Return
                | NodeKind::Break
                | NodeKind::Continue
                | NodeKind::Throw
                | NodeKind::Label
        )
    }

    /// Check if this kind is a control-flow statement with a header and body.
    #[inline]
    pub fn is_control(self) -> bool {
        matches!(
            self,
            NodeKind::If
                | NodeKind::For
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::Switch
                | NodeKind::Try
                | NodeKind::Sync
        )
    }

    /// Check if this kind is an expression.
    #[inline]
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::Assign
                | NodeKind::Ternary
                | NodeKind::Binary
                | NodeKind::Unary
                | NodeKind::Call
                | NodeKind::Select
                | NodeKind::New
                | NodeKind::ArrayInit
                | NodeKind::Paren
                | NodeKind::Cast
                | NodeKind::Ident
                | NodeKind::Literal
        )
    }

    /// Check if direct children of this kind may keep free vertical spacing.
    ///
    /// These are the positions where the blank-line policy consults the
    /// original source gap: block statements, type bodies, and the file
    /// root. Everywhere else nested nodes inherit the enclosing statement's
    /// spacing decision.
    #[inline]
    pub fn allows_free_spacing(self) -> bool {
        matches!(
            self,
            NodeKind::File
                | NodeKind::Block
                | NodeKind::TypeBody
                | NodeKind::EnumBody
                | NodeKind::AnonClassBody
                | NodeKind::CaseGroup
        )
    }

    /// Check if this kind is a declaration or assignment eligible for
    /// operator alignment inside a chunk.
    #[inline]
    pub fn is_alignable(self) -> bool {
        matches!(
            self,
            NodeKind::Field | NodeKind::LocalVar | NodeKind::ExprStmt
        )
    }

    /// Human-readable name for diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Package => "package declaration",
            NodeKind::Import => "import declaration",
            NodeKind::Class => "class declaration",
            NodeKind::Interface => "interface declaration",
            NodeKind::Enum => "enum declaration",
            NodeKind::Annotation => "annotation declaration",
            NodeKind::TypeBody => "type body",
            NodeKind::EnumBody => "enum body",
            NodeKind::AnonClassBody => "anonymous class body",
            NodeKind::EnumConstant => "enum constant",
            NodeKind::Method => "method declaration",
            NodeKind::Constructor => "constructor declaration",
            NodeKind::Field => "field declaration",
            NodeKind::StaticInit => "static initializer",
            NodeKind::InstanceInit => "instance initializer",
            NodeKind::Modifiers => "modifier list",
            NodeKind::Modifier => "modifier",
            NodeKind::TypeRef => "type reference",
            NodeKind::ParamList => "parameter list",
            NodeKind::Param => "parameter",
            NodeKind::Throws => "throws clause",
            NodeKind::Block => "block",
            NodeKind::EmptyStmt => "empty statement",
            NodeKind::ExprStmt => "expression statement",
            NodeKind::LocalVar => "local variable declaration",
            NodeKind::If => "if statement",
            NodeKind::For => "for statement",
            NodeKind::ForInit => "for initializer",
            NodeKind::ForCond => "for condition",
            NodeKind::ForUpdate => "for update",
            NodeKind::While => "while statement",
            NodeKind::DoWhile => "do-while statement",
            NodeKind::Switch => "switch statement",
            NodeKind::CaseGroup => "case group",
            NodeKind::CaseLabel => "case label",
            NodeKind::Try => "try statement",
            NodeKind::Catch => "catch clause",
            NodeKind::Finally => "finally clause",
            NodeKind::Sync => "synchronized statement",
            NodeKind::Return => "return statement",
            NodeKind::Break => "break statement",
            NodeKind::Continue => "continue statement",
            NodeKind::Throw => "throw statement",
            NodeKind::Label => "labeled statement",
            NodeKind::Assign => "assignment",
            NodeKind::Ternary => "conditional expression",
            NodeKind::Binary => "binary expression",
            NodeKind::Unary => "unary expression",
            NodeKind::Call => "method call",
            NodeKind::ArgList => "argument list",
            NodeKind::Select => "qualified name",
            NodeKind::New => "instantiation",
            NodeKind::ArrayInit => "array initializer",
            NodeKind::Paren => "parenthesized expression",
            NodeKind::Cast => "cast expression",
            NodeKind::Ident => "identifier",
            NodeKind::Literal => "literal",
        }
    }

    /// Keyword the renderer emits for a control statement, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            NodeKind::Package => Some("package"),
            NodeKind::Import => Some("import"),
            NodeKind::Class => Some("class"),
            NodeKind::Interface => Some("interface"),
            NodeKind::Enum => Some("enum"),
            NodeKind::Annotation => Some("@interface"),
            NodeKind::If => Some("if"),
            NodeKind::For => Some("for"),
            NodeKind::While => Some("while"),
            NodeKind::DoWhile => Some("do"),
            NodeKind::Switch => Some("switch"),
            NodeKind::Try => Some("try"),
            NodeKind::Catch => Some("catch"),
            NodeKind::Finally => Some("finally"),
            NodeKind::Sync => Some("synchronized"),
            NodeKind::Return => Some("return"),
            NodeKind::Break => Some("break"),
            NodeKind::Continue => Some("continue"),
            NodeKind::Throw => Some("throw"),
            NodeKind::New => Some("new"),
            NodeKind::Throws => Some("throws"),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
