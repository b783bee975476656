//! Declaration strategies: file structure, types, members.

use lathe_ast::{NodeId, NodeKind};

use super::{align, continuation_column, req_child};
use crate::error::RenderError;
use crate::render::RenderJob;
use crate::surface::RenderSurface;

/// File root: package, imports, type declarations, all statement-level.
pub(crate) fn file(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    align::statement_list(job, id, s, false)
}

/// `package a.b.c;`
pub(crate) fn package(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let name = req_child(job, id, 0, "package name")?;
    s.emit("package", NodeKind::Package);
    s.space();
    job.render(name, s)?;
    s.emit(";", NodeKind::Package);
    Ok(())
}

/// `import a.b.C;`
pub(crate) fn import(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let name = req_child(job, id, 0, "imported name")?;
    s.emit("import", NodeKind::Import);
    s.space();
    job.render(name, s)?;
    s.emit(";", NodeKind::Import);
    Ok(())
}

/// Class, interface, enum, or annotation declaration.
///
/// Children in order: optional `Modifiers`, the name `Ident`, any number of
/// `TypeRef` header clauses carrying their clause text verbatim
/// (`extends Base`, `implements Runnable`), and the body.
pub(crate) fn type_decl(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let kind = tree.kind(id);
    let keyword = kind.keyword().unwrap_or("class");

    let mut named = false;
    let mut body = None;
    for child in tree.children(id) {
        match tree.kind(child) {
            NodeKind::Modifiers => {
                job.render(child, s)?;
                s.space();
            }
            NodeKind::Ident => {
                s.emit(keyword, kind);
                s.space();
                job.render(child, s)?;
                named = true;
            }
            NodeKind::TypeRef => {
                s.space();
                job.render(child, s)?;
            }
            NodeKind::TypeBody | NodeKind::EnumBody => body = Some(child),
            _ => job.render(child, s)?,
        }
    }
    let node = tree.node(id);
    if !named {
        return Err(RenderError::MissingChild {
            kind,
            pos: node.span.start,
            what: "type name",
        });
    }
    let Some(body) = body else {
        return Err(RenderError::MissingChild {
            kind,
            pos: node.span.start,
            what: "type body",
        });
    };
    job.render(body, s)
}

/// One enum constant: name plus optional constructor arguments.
/// The enclosing enum body emits the separators.
pub(crate) fn enum_constant(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let name = req_child(job, id, 0, "constant name")?;
    job.render(name, s)?;
    for child in tree.children(id).skip(1) {
        job.render(child, s)?;
    }
    Ok(())
}

/// Method or constructor declaration.
///
/// Children in order: optional `Modifiers`, return `TypeRef` (absent on
/// constructors), name `Ident`, `ParamList`, optional `Throws`, optional
/// `Block` body. No body renders as an abstract declaration with `;`.
pub(crate) fn method(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let kind = tree.kind(id);

    let mut named = false;
    let mut has_params = false;
    let mut body = None;
    for child in tree.children(id) {
        match tree.kind(child) {
            NodeKind::Modifiers => {
                job.render(child, s)?;
                s.space();
            }
            NodeKind::TypeRef => {
                job.render(child, s)?;
                s.space();
            }
            NodeKind::Ident => {
                job.render(child, s)?;
                named = true;
            }
            NodeKind::ParamList => {
                job.render(child, s)?;
                has_params = true;
            }
            NodeKind::Throws => {
                job.render(child, s)?;
            }
            NodeKind::Block => body = Some(child),
            _ => job.render(child, s)?,
        }
    }
    let node = tree.node(id);
    if !named {
        return Err(RenderError::MissingChild {
            kind,
            pos: node.span.start,
            what: "name",
        });
    }
    if !has_params {
        return Err(RenderError::MissingChild {
            kind,
            pos: node.span.start,
            what: "parameter list",
        });
    }
    match body {
        Some(body) => job.render(body, s),
        None => {
            s.emit(";", kind);
            Ok(())
        }
    }
}

/// Static or instance initializer block.
pub(crate) fn initializer(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let body = req_child(job, id, 0, "initializer body")?;
    if job.tree.kind(id) == NodeKind::StaticInit {
        s.emit("static", NodeKind::StaticInit);
    }
    job.render(body, s)
}

/// Modifier list: `public static final`.
pub(crate) fn modifiers(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let mut first = true;
    for child in tree.children(id) {
        if !first {
            s.space();
        }
        job.render(child, s)?;
        first = false;
    }
    Ok(())
}

/// One parameter: optional modifiers, type, name.
pub(crate) fn param(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let mut first = true;
    for child in tree.children(id) {
        if !first {
            s.space();
        }
        job.render(child, s)?;
        first = false;
    }
    Ok(())
}

/// `throws A, B` clause; wraps to the continuation column when oversize.
pub(crate) fn throws(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    // Exception lists are flat TypeRef leaves; the clause width is known
    // without a probe.
    let mut width = "throws".chars().count() + 1;
    for (i, child) in tree.children(id).enumerate() {
        if i > 0 {
            width += 2;
        }
        width += job.node_text(child).chars().count();
    }
    if s.fits(width + 1) {
        s.space();
    } else {
        s.break_to_column(continuation_column(job, s));
    }
    s.emit("throws", NodeKind::Throws);
    s.space();
    // A clause too wide even for its own continuation line flows, breaking
    // between exceptions.
    let align = continuation_column(job, s);
    let mut first = true;
    for child in tree.children(id) {
        if !first {
            s.emit(",", NodeKind::Throws);
            let w = job.node_text(child).chars().count();
            if s.fits(w + 2) {
                s.space();
            } else {
                s.break_to_column(align);
            }
        }
        job.render(child, s)?;
        first = false;
    }
    Ok(())
}

/// Render the left-hand side of a field or local-variable declaration:
/// modifiers, type, name. Shared between the declaration strategies and the
/// alignment chunk sizing probe.
pub(crate) fn decl_lhs(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let kind = tree.kind(id);
    let mut first = true;
    for child in tree.children(id) {
        match tree.kind(child) {
            NodeKind::Modifiers | NodeKind::TypeRef | NodeKind::Ident => {
                if !first {
                    s.space();
                }
                job.render(child, s)?;
                first = false;
            }
            _ => break,
        }
    }
    if first {
        let node = tree.node(id);
        return Err(RenderError::MissingChild {
            kind,
            pos: node.span.start,
            what: "declared name",
        });
    }
    Ok(())
}

/// Initializer expression of a field or local variable, if any: the first
/// child that is not part of the left-hand side.
pub(crate) fn decl_init(job: &RenderJob, id: NodeId) -> Option<NodeId> {
    let tree = job.tree;
    tree.children(id).find(|&c| {
        !matches!(
            tree.kind(c),
            NodeKind::Modifiers | NodeKind::TypeRef | NodeKind::Ident
        )
    })
}

/// Field declaration: `mods type name = init;`.
pub(crate) fn field(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    declaration(job, id, s)?;
    s.emit(";", job.tree.kind(id));
    Ok(())
}

/// Local variable declaration. Inside a control header (a `for` initializer)
/// the enclosing statement owns the `;`.
pub(crate) fn local_var(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    declaration(job, id, s)?;
    if !s.flags.in_control_header {
        s.emit(";", NodeKind::LocalVar);
    }
    Ok(())
}

/// Shared body of field/local-variable rendering, with operator alignment.
fn declaration(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let kind = job.tree.kind(id);
    decl_lhs(job, id, s)?;
    let Some(init) = decl_init(job, id) else {
        return Ok(());
    };
    // Taken, not read: an assignment nested in the initializer must not
    // pad to the chunk column.
    match job.align_offset.take() {
        Some(column) => {
            s.pad_to(column);
        }
        None => s.space(),
    }
    s.emit("=", kind);
    s.space();
    // An oversize initializer still starts on this line; its own strategy
    // wraps internally (argument lists, array initializers, binary chains).
    job.render(init, s)
}
