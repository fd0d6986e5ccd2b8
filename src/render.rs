// src/render.rs
//! HTML post-processing for transcripts and refactored source.

/// Escape `<` so text can sit inside a `<pre>` block.
pub fn escape_lt(text: &str) -> String {
    text.replace('<', "&lt;")
}

pub fn pre_wrap(transcript: &str) -> String {
    format!("<pre>{}</pre>", escape_lt(transcript))
}

/// Fixed-size monospace block used for refactor results.
pub fn refactor_block(escaped_source: &str) -> String {
    format!("<pre style=\"font-size:12px;\">{}</pre>", escaped_source)
}

/// Stylesheet matching the page theme, including interpreter diagnostic tables.
pub fn colorize_stylesheet(bgcolor: &str, color: &str) -> String {
    let bg = escape_lt(bgcolor);
    let fg = escape_lt(color);
    format!(
        "\n<style>\n\
         html {{ width: 100%; background-color: {bg}; color: {fg}; }}\n\
         .xdebug-error th {{ background-color: {bg}; font-weight: normal; font-family: sans-serif; }}\n\
         .xdebug-error td {{ color: {fg}; }}\n\
         .xdebug-error th span {{ background-color: {bg} !important; }}\n\
         </style>"
    )
}

pub fn error_block(message: &str) -> String {
    format!("<pre class=\"runphp-error\">Error: {}</pre>", escape_lt(message))
}
