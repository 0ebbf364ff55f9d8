//! Test fixtures and constants.

/// Validation message listing every valid process name
pub fn invalid_process_message(value: &str) -> String {
    format!(
        "Invalid processName: '{value}'. Expected one of: WireDrawing, Stranding, \
         Laying, Extrusion, Bedding, Sheathing, Armouring."
    )
}

pub const MISSING_PROCESS_NAME: &str = "Missing required field: processName";

/// Render page that draws `svg` client-side after the shell has loaded
pub fn render_page_html(svg: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>render</title></head>
<body>
<div id="root"></div>
<script>
  setTimeout(function () {{
    document.getElementById("root").innerHTML = '{svg}';
  }}, 300);
</script>
</body>
</html>"#
    )
}

/// Render page that never draws anything
pub const EMPTY_RENDER_PAGE: &str =
    "<!DOCTYPE html><html><body><div id=\"root\">loading...</div></body></html>";
