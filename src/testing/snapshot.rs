//! Snapshot rendering helpers.
//!
//! Converts a [`MemoryTarget`] subtree into an indented, markup-like string
//! suitable for snapshot assertions.

use crate::target::{Handle, InputKind, RawValue};

use super::memory::{MemoryTarget, PrimitiveKind};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render the subtree under `root` as text, one primitive per line.
///
/// Containers render as `<tag>` followed by their quoted text if any, inputs as
/// `<input kind value=".." placeholder="..">`, leaves as their quoted text, and
/// markers as `<!--label-->`. Children are indented by two spaces per level.
/// The final line does not have a trailing newline.
///
/// # Examples
///
/// ```ignore
/// use bindview::testing::{render_to_string, MemoryTarget};
///
/// let output = render_to_string(&target, host);
/// assert!(output.contains("\"Hello\""));
/// ```
pub fn render_to_string(target: &MemoryTarget, root: Handle) -> String {
    let mut lines = Vec::new();
    render_into(target, root, 0, &mut lines);
    lines.join("\n")
}

fn render_into(target: &MemoryTarget, handle: Handle, depth: usize, lines: &mut Vec<String>) {
    let Some(node) = target.get(handle) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let line = match (&node.kind, node.input_kind) {
        (PrimitiveKind::Leaf, _) => format!("{:?}", node.text),
        (PrimitiveKind::Marker(label), _) => format!("<!--{label}-->"),
        (PrimitiveKind::Container(tag), Some(kind)) => {
            let value = match &node.value {
                RawValue::Text(text) => format!("value={text:?}"),
                RawValue::Checked(checked) => format!("checked={checked}"),
            };
            let mut line = format!("<{tag} {} {value}", kind_name(kind));
            if !node.placeholder.is_empty() {
                line.push_str(&format!(" placeholder={:?}", node.placeholder));
            }
            line.push('>');
            line
        }
        (PrimitiveKind::Container(tag), None) if node.text.is_empty() => format!("<{tag}>"),
        (PrimitiveKind::Container(tag), None) => format!("<{tag}> {:?}", node.text),
    };
    lines.push(format!("{indent}{line}"));
    for child in target.children(handle) {
        render_into(target, child, depth + 1, lines);
    }
}

fn kind_name(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Text => "text",
        InputKind::Number => "number",
        InputKind::Checkbox => "checkbox",
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::RenderTarget;

    #[test]
    fn renders_nested_tree() {
        let target = MemoryTarget::new();
        let div = target.create_container("div");
        let label = target.create_leaf();
        let input = target.create_container("input");
        let marker = target.create_marker("foreach");
        target.write_text(label, "Name:");
        target.set_input_kind(input, InputKind::Text);
        target.write_input_value(input, RawValue::Text("Ada".into()));
        target.write_placeholder(input, "name");
        target.append_child(div, label);
        target.append_child(div, input);
        target.append_child(div, marker);

        insta::assert_snapshot!(render_to_string(&target, div), @r#"
        <div>
          "Name:"
          <input text value="Ada" placeholder="name">
          <!--foreach-->
        "#);
    }

    #[test]
    fn renders_checkbox_and_text_container() {
        let target = MemoryTarget::new();
        let p = target.create_container("p");
        target.write_text(p, "hi");
        let check = target.create_container("input");
        target.set_input_kind(check, InputKind::Checkbox);
        target.append_child(p, check);
        assert_eq!(
            render_to_string(&target, p),
            "<p> \"hi\"\n  <input checkbox checked=false>"
        );
    }

    #[test]
    fn unknown_handle_renders_nothing() {
        let other = MemoryTarget::new();
        let foreign = other.create_leaf();
        assert_eq!(render_to_string(&MemoryTarget::new(), foreign), "");
    }
}
