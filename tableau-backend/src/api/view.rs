use axum::{extract::State, response::Html};
use tableau_core::types::{Board, Category, Column, Ticket};

use crate::state::AppState;

/// GET / -- reclassify, persist and render the whole board.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let board = state.board.view();
    let categories = state.categories.list();
    Html(render_page(&board, &categories))
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f4f5f7; color: #172b4d; }
header { padding: 12px 20px; background: #0052cc; color: #fff; }
.board { display: flex; gap: 16px; padding: 16px; align-items: flex-start; }
.column { flex: 1; background: #ebecf0; border-radius: 6px; padding: 8px; min-height: 200px; }
.column.drop-target { outline: 2px dashed #0052cc; }
.column h2 { font-size: 16px; margin: 4px 4px 12px; }
.ticket { background: #fff; border-radius: 4px; padding: 8px; margin-bottom: 8px; box-shadow: 0 1px 1px rgba(9,30,66,.25); cursor: grab; }
.ticket .comment { font-size: 13px; color: #5e6c84; white-space: pre-wrap; }
.ticket .due { font-size: 12px; color: #5e6c84; }
.badge { display: inline-block; font-size: 11px; padding: 1px 6px; border-radius: 8px; color: #fff; }
.ticket form, .column form { margin-top: 6px; }
.categories { padding: 0 16px 16px; }
.categories li { margin-bottom: 4px; }
.swatch { display: inline-block; width: 12px; height: 12px; border-radius: 2px; vertical-align: middle; }
"#;

const SCRIPT: &str = r#"
let dragged = null;
document.querySelectorAll('.ticket').forEach((el) => {
  el.addEventListener('dragstart', () => {
    dragged = { column: el.dataset.column, index: el.dataset.index };
  });
});
document.querySelectorAll('.column').forEach((col) => {
  col.addEventListener('dragover', (e) => { e.preventDefault(); col.classList.add('drop-target'); });
  col.addEventListener('dragleave', () => col.classList.remove('drop-target'));
  col.addEventListener('drop', async (e) => {
    e.preventDefault();
    col.classList.remove('drop-target');
    if (!dragged) return;
    const body = new URLSearchParams({
      from_column: dragged.column,
      to_column: col.dataset.column,
      from_index: dragged.index,
    });
    dragged = null;
    const res = await fetch('/move', { method: 'POST', body });
    if (res.status === 204) window.location.reload();
  });
});
async function createCategory(form) {
  const body = JSON.stringify({ name: form.elements['name'].value, color: form.elements['color'].value });
  const res = await fetch('/category', { method: 'POST', headers: { 'Content-Type': 'application/json' }, body });
  if (res.status === 201) window.location.reload();
}
async function updateCategory(id, form) {
  const body = JSON.stringify({ name: form.elements['name'].value, color: form.elements['color'].value });
  await fetch('/category/' + id, { method: 'PATCH', headers: { 'Content-Type': 'application/json' }, body });
  window.location.reload();
}
async function deleteCategory(id) {
  await fetch('/category/' + id, { method: 'DELETE' });
  window.location.reload();
}
"#;

pub(crate) fn render_page(board: &Board, categories: &[Category]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Tableau Kanban</title>\n");
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));
    html.push_str("<header><h1>Tableau Kanban</h1></header>\n<main class=\"board\">\n");
    for (column, tickets) in board.columns() {
        render_column(&mut html, column, tickets, categories);
    }
    html.push_str("</main>\n");
    render_categories(&mut html, categories);
    html.push_str(&format!("<script>{SCRIPT}</script>\n</body>\n</html>\n"));
    html
}

fn render_column(html: &mut String, column: Column, tickets: &[Ticket], categories: &[Category]) {
    let name = escape_html(column.name());
    html.push_str(&format!(
        "<section class=\"column\" data-column=\"{name}\">\n<h2>{name} ({})</h2>\n",
        tickets.len()
    ));
    for (index, ticket) in tickets.iter().enumerate() {
        render_ticket(html, &name, index, ticket, categories);
    }

    html.push_str("<form method=\"post\" action=\"/add\">\n");
    html.push_str(&format!("<input type=\"hidden\" name=\"column\" value=\"{name}\">\n"));
    html.push_str("<input name=\"title\" placeholder=\"Titre\" required>\n");
    html.push_str("<textarea name=\"comment\" placeholder=\"Commentaire\"></textarea>\n");
    html.push_str(&category_select("category", None, categories));
    html.push_str("<input type=\"date\" name=\"date\">\n");
    html.push_str("<button type=\"submit\">Ajouter</button>\n</form>\n</section>\n");
}

fn render_ticket(
    html: &mut String,
    column: &str,
    index: usize,
    ticket: &Ticket,
    categories: &[Category],
) {
    html.push_str(&format!(
        "<article class=\"ticket\" draggable=\"true\" data-column=\"{column}\" data-index=\"{index}\">\n"
    ));
    html.push_str(&format!("<strong>{}</strong>\n", escape_html(&ticket.title)));

    // Dangling category ids render without a badge.
    if let Some(category) = ticket
        .category
        .and_then(|id| categories.iter().find(|c| c.id == id))
    {
        html.push_str(&format!(
            "<span class=\"badge\" style=\"background: {}\">{}</span>\n",
            escape_html(&category.color),
            escape_html(&category.name)
        ));
    }
    if !ticket.comment.is_empty() {
        html.push_str(&format!(
            "<div class=\"comment\">{}</div>\n",
            escape_html(&ticket.comment)
        ));
    }
    let date = ticket.date.as_deref().unwrap_or("");
    if !date.trim().is_empty() {
        html.push_str(&format!("<div class=\"due\">Échéance : {}</div>\n", escape_html(date)));
    }

    html.push_str("<details><summary>Modifier</summary>\n<form method=\"post\" action=\"/edit\">\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"column\" value=\"{column}\">\n<input type=\"hidden\" name=\"index\" value=\"{index}\">\n"
    ));
    html.push_str(&format!(
        "<input name=\"new_title\" value=\"{}\" required>\n",
        escape_html(&ticket.title)
    ));
    html.push_str(&format!(
        "<textarea name=\"new_comment\">{}</textarea>\n",
        escape_html(&ticket.comment)
    ));
    html.push_str(&category_select("edit_category", ticket.category, categories));
    html.push_str(&format!(
        "<input type=\"date\" name=\"date\" value=\"{}\">\n",
        escape_html(date.trim())
    ));
    html.push_str("<button type=\"submit\">Enregistrer</button>\n</form>\n</details>\n");

    html.push_str("<form method=\"post\" action=\"/delete\">\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"column\" value=\"{column}\">\n<input type=\"hidden\" name=\"index\" value=\"{index}\">\n"
    ));
    html.push_str("<button type=\"submit\">Supprimer</button>\n</form>\n</article>\n");
}

fn category_select(field: &str, selected: Option<i64>, categories: &[Category]) -> String {
    let mut select = format!("<select name=\"{field}\">\n<option value=\"\">Aucune catégorie</option>\n");
    for category in categories {
        let marker = if Some(category.id) == selected { " selected" } else { "" };
        select.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>\n",
            category.id,
            escape_html(&category.name)
        ));
    }
    select.push_str("</select>\n");
    select
}

fn render_categories(html: &mut String, categories: &[Category]) {
    html.push_str("<section class=\"categories\">\n<h2>Catégories</h2>\n<ul>\n");
    for category in categories {
        let id = category.id;
        let name = escape_html(&category.name);
        let color = escape_html(&category.color);
        html.push_str(&format!(
            "<li><span class=\"swatch\" style=\"background: {color}\"></span>\n\
             <form onsubmit=\"updateCategory({id}, this); return false\" style=\"display: inline\">\n\
             <input name=\"name\" value=\"{name}\">\n<input name=\"color\" value=\"{color}\">\n\
             <button type=\"submit\">Renommer</button>\n</form>\n\
             <button type=\"button\" onclick=\"deleteCategory({id})\">Supprimer</button></li>\n"
        ));
    }
    html.push_str("</ul>\n<form onsubmit=\"createCategory(this); return false\">\n");
    html.push_str("<input name=\"name\" placeholder=\"Nom\" required>\n");
    html.push_str("<input name=\"color\" placeholder=\"Couleur\" value=\"#0052cc\" required>\n");
    html.push_str("<button type=\"submit\">Créer</button>\n</form>\n</section>\n");
}
