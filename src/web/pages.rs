//! HTML page generation
//!
//! One server-rendered page: the lookup form and, once a document has been
//! entered, the results area.

use crate::licensing::render::{Block, Report};
use crate::licensing::DocumentKind;

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #222; }
header { display: flex; align-items: center; gap: 1.5rem; padding: 1rem 2rem; border-bottom: 1px solid #ddd; }
header img { height: 72px; }
header h1 { margin: 0; }
details { margin-top: .5rem; color: #555; }
main { display: grid; grid-template-columns: 1fr 3fr; gap: 2rem; padding: 1rem 2rem; }
form label { display: block; margin: .75rem 0 .25rem; }
form select, form input { width: 100%; padding: .4rem; box-sizing: border-box; }
form button { margin-top: 1rem; padding: .4rem 1rem; }
.results p { margin: .2rem 0; }
.license { margin: .75rem 0; padding: .5rem .75rem; border-left: 4px solid #2a7; background: #f4fbf7; }
.notice { color: #775; }
"#;

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// The lookup page.
///
/// `selected` is the raw selector label from the request; `report` is `None`
/// when no document has been entered.
pub fn index_page(selected: &str, document: &str, report: Option<&Report>) -> String {
    let options: String = DocumentKind::ALL
        .iter()
        .map(|kind| {
            let label = kind.label();
            let attr = if label == selected { " selected" } else { "" };
            format!(
                r#"<option value="{value}"{attr}>{value}</option>"#,
                value = escape_html(label),
                attr = attr
            )
        })
        .collect::<Vec<_>>()
        .join("\n                ");

    let results = report.map(results_html).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="ca">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>FCOC - consulta Llicencia</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <img src="/logo.png" alt="FCOC">
        <div>
            <h1>Consulta llicencia FCOC</h1>
            <details>
                <summary>About</summary>
                <p>Permet comprobar si un esportista disposa de llicència federativa tramitada.</p>
                <p>Cal introduir alguna d'aquestes dades: DNI/NIE, passaport o CATSALUT.</p>
            </details>
        </div>
    </header>

    <main>
        <section>
            <h3>Select...</h3>
            <form method="get" action="/">
                <label for="tipus">Escull una de les opcions:</label>
                <select id="tipus" name="tipus">
                {options}
                </select>
                <label for="document">Entra {selected}: </label>
                <input id="document" name="document" type="text" value="{document}" autocomplete="off">
                <button type="submit">Consulta</button>
            </form>
        </section>

        <section class="results">
{results}
        </section>
    </main>
</body>
</html>
"#,
        css = CSS,
        options = options,
        selected = escape_html(selected),
        document = escape_html(document),
        results = results,
    )
}

fn results_html(report: &Report) -> String {
    let mut html = format!("            <p>{}</p>\n", escape_html(&report.summary()));
    for block in &report.blocks {
        html.push_str(&block_html(block));
    }
    html
}

fn block_html(block: &Block) -> String {
    let class = match block {
        Block::Detail { .. } => "license",
        Block::NotProcessed { .. } | Block::NotAthlete { .. } => "notice",
    };
    let lines: String = block
        .lines()
        .iter()
        .map(|line| format!("                <p>{}</p>\n", escape_html(line.trim_start())))
        .collect();
    format!("            <div class=\"{}\">\n{}            </div>\n", class, lines)
}
