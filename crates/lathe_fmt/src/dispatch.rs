//! Node dispatch.
//!
//! Every node kind maps to exactly one stateless strategy function. The
//! exhaustive match over the closed [`NodeKind`] union is the dispatch
//! table: the compiler builds the jump once, and adding a kind without a
//! strategy is a compile error. Marker balance is asserted around every
//! dispatch, so a strategy that leaks or over-pops markers fails at the
//! node that did it.

use lathe_ast::{NodeId, NodeKind};

use crate::error::RenderError;
use crate::render::RenderJob;
use crate::strategies::{args, array, braces, decls, exprs, stmts};
use crate::surface::RenderSurface;

/// Render one node by its kind's strategy.
pub(crate) fn dispatch(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let kind = job.tree.kind(id);
    let depth = s.marker_depth();

    let result = match kind {
        NodeKind::File => decls::file(job, id, s),
        NodeKind::Package => decls::package(job, id, s),
        NodeKind::Import => decls::import(job, id, s),

        NodeKind::Class | NodeKind::Interface | NodeKind::Enum | NodeKind::Annotation => {
            decls::type_decl(job, id, s)
        }
        NodeKind::TypeBody | NodeKind::EnumBody | NodeKind::AnonClassBody => {
            braces::type_body(job, id, s)
        }
        NodeKind::EnumConstant => decls::enum_constant(job, id, s),

        NodeKind::Method | NodeKind::Constructor => decls::method(job, id, s),
        NodeKind::Field => decls::field(job, id, s),
        NodeKind::StaticInit | NodeKind::InstanceInit => decls::initializer(job, id, s),
        NodeKind::Modifiers => decls::modifiers(job, id, s),
        NodeKind::Param => decls::param(job, id, s),
        NodeKind::Throws => decls::throws(job, id, s),
        NodeKind::ParamList => args::param_list(job, id, s),

        NodeKind::Block => braces::block(job, id, s),
        NodeKind::EmptyStmt => stmts::empty(job, id, s),
        NodeKind::ExprStmt => stmts::expr_stmt(job, id, s),
        NodeKind::LocalVar => decls::local_var(job, id, s),
        NodeKind::If => stmts::if_stmt(job, id, s),
        NodeKind::For => stmts::for_stmt(job, id, s),
        NodeKind::ForInit | NodeKind::ForCond | NodeKind::ForUpdate => {
            stmts::for_section(job, id, s)
        }
        NodeKind::While => stmts::while_stmt(job, id, s),
        NodeKind::DoWhile => stmts::do_while(job, id, s),
        NodeKind::Switch => stmts::switch(job, id, s),
        NodeKind::CaseGroup => stmts::case_group(job, id, s),
        NodeKind::Try => stmts::try_stmt(job, id, s),
        NodeKind::Catch => stmts::catch_clause(job, id, s),
        NodeKind::Finally => stmts::finally_clause(job, id, s),
        NodeKind::Sync => stmts::sync_stmt(job, id, s),
        NodeKind::Return | NodeKind::Throw => stmts::return_throw(job, id, s),
        NodeKind::Break | NodeKind::Continue => stmts::break_continue(job, id, s),
        NodeKind::Label => stmts::label(job, id, s),

        NodeKind::Assign => exprs::assign(job, id, s),
        NodeKind::Ternary => exprs::ternary(job, id, s),
        NodeKind::Binary => exprs::binary(job, id, s),
        NodeKind::Unary => exprs::unary(job, id, s),
        NodeKind::Call => exprs::call(job, id, s),
        NodeKind::ArgList => args::arg_list(job, id, s),
        NodeKind::Select => exprs::select(job, id, s),
        NodeKind::New => exprs::new_expr(job, id, s),
        NodeKind::ArrayInit => array::array_init(job, id, s),
        NodeKind::Paren => exprs::paren(job, id, s),
        NodeKind::Cast => exprs::cast(job, id, s),

        NodeKind::Modifier
        | NodeKind::TypeRef
        | NodeKind::CaseLabel
        | NodeKind::Ident
        | NodeKind::Literal => leaf(job, id, s),
    };

    debug_assert_eq!(
        depth,
        s.marker_depth(),
        "strategy for {kind:?} unbalanced the marker stack",
    );
    result
}

/// Default strategy for leaf kinds: emit the token text verbatim.
fn leaf(job: &mut RenderJob, id: NodeId, s: &mut RenderSurface) -> Result<(), RenderError> {
    let kind = job.tree.kind(id);
    s.emit(job.node_text(id), kind);
    Ok(())
}

/// Default strategy for container kinds needing no special layout:
/// dispatch children in first-child/next-sibling order.
pub(crate) fn default_container(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    for child in tree.children(id) {
        job.render(child, s)?;
    }
    Ok(())
}
