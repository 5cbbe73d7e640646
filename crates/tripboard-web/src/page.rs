//! Server-rendered dashboard page.
//!
//! Everything dynamic comes from a [`DashboardSnapshot`]; user text is
//! escaped on the way out. The location picker is the only client-side
//! behavior and lives in [`SCRIPT`].

use tripboard::{Expense, Money, Task};

use crate::snapshot::DashboardSnapshot;

const CURRENCY: &str = "₹";

/// Categories offered by the expense form. Anything else posted is stored as-is.
pub const EXPENSE_CATEGORIES: [&str; 5] = ["Food", "Shopping", "Utilities", "Transport", "Other"];

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Trip &amp; Task Management Dashboard</title>
<style>
body { font-family: system-ui, sans-serif; background: #f3f4f6; margin: 0; color: #1f2937; }
header { background: #4f46e5; color: #fff; padding: 1.25rem 2rem; }
main { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; padding: 1.5rem 2rem; }
@media (max-width: 900px) { main { grid-template-columns: 1fr; } }
section { background: #fff; border-radius: .75rem; padding: 1.25rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
input, select { width: 100%; box-sizing: border-box; padding: .5rem; margin: .25rem 0 .75rem; border: 1px solid #d1d5db; border-radius: .375rem; }
button { background: #4f46e5; color: #fff; border: 0; padding: .5rem 1rem; border-radius: .375rem; cursor: pointer; }
button.danger { background: #dc2626; }
button.muted { background: #6b7280; }
ul.items { list-style: none; padding: 0; }
ul.items li { display: flex; justify-content: space-between; align-items: center; padding: .6rem 0; border-bottom: 1px solid #e5e7eb; }
.sub { color: #6b7280; font-size: .85rem; }
.cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: .75rem; margin-bottom: 1rem; }
.card { border-radius: .5rem; padding: .75rem; background: #eef2ff; }
.card.over { background: #fee2e2; color: #b91c1c; }
.card .value { font-size: 1.3rem; font-weight: 600; }
.suggestions { border: 1px solid #d1d5db; border-radius: .375rem; max-height: 14rem; overflow-y: auto; display: none; }
.suggestions div { padding: .5rem; cursor: pointer; }
.suggestions div:hover { background: #eef2ff; }
.suggestions div.disabled { color: #9ca3af; cursor: not-allowed; }
#map-preview { display: none; margin-bottom: .75rem; }
#map-preview img { width: 100%; border-radius: .375rem; }
.hidden { display: none; }
.modal { position: fixed; inset: 0; background: rgba(0,0,0,.45); display: none; align-items: center; justify-content: center; }
.modal.open { display: flex; }
.modal .box { background: #fff; padding: 1.5rem; border-radius: .75rem; min-width: 18rem; }
</style>
</head>
<body>
<header><h1>Trip &amp; Task Management Dashboard</h1></header>
<main>
"#;

const MODAL: &str = r#"<div id="confirm-modal" class="modal">
<div class="box">
<p>Are you sure you want to delete this item?</p>
<button type="button" class="muted" onclick="closeConfirm()">Cancel</button>
<button type="button" class="danger" onclick="confirmDelete()">Delete</button>
</div>
</div>
"#;

/// Location picker, edit-budget toggle and delete confirmation.
pub const SCRIPT: &str = r#"<script>
const MIN_QUERY_CHARS = 3;
const DEBOUNCE_MS = 300;
const input = document.getElementById('location-input');
const list = document.getElementById('location-suggestions');
const preview = document.getElementById('map-preview');
const previewImg = document.getElementById('map-image');
const previewCaption = document.getElementById('map-caption');
let pending = null;
let chosen = null;
let debounceTimer = null;

function showMessage(text) {
  list.replaceChildren();
  const row = document.createElement('div');
  row.className = 'disabled';
  row.textContent = text;
  list.appendChild(row);
  list.style.display = 'block';
}

function hideSuggestions() {
  list.replaceChildren();
  list.style.display = 'none';
}

function renderSuggestions(items) {
  if (!Array.isArray(items) || items.length === 0) {
    showMessage('No locations found.');
    return;
  }
  list.replaceChildren();
  for (const item of items) {
    const row = document.createElement('div');
    const name = String(item.name ?? '');
    const address = String(item.address ?? '');
    const lat = Number(item.latitude);
    const lng = Number(item.longitude);
    const usable = typeof item.latitude === 'number' && typeof item.longitude === 'number'
      && Number.isFinite(lat) && Number.isFinite(lng);
    row.textContent = address ? name + ', ' + address : name;
    if (usable) {
      row.addEventListener('click', () => previewLocation({ name, address, lat, lng }));
    } else {
      row.className = 'disabled';
      const note = document.createElement('span');
      note.className = 'sub';
      note.textContent = ' Map data unavailable.';
      row.appendChild(note);
    }
    list.appendChild(row);
  }
  list.style.display = 'block';
}

function previewLocation(place) {
  pending = place;
  const label = place.lat.toFixed(4) + ', ' + place.lng.toFixed(4);
  previewImg.src = 'https://placehold.co/600x240?text=' + encodeURIComponent(label);
  previewImg.alt = 'Map of ' + place.name;
  previewCaption.textContent = place.name + ' (' + label + ')';
  preview.style.display = 'block';
  hideSuggestions();
}

function selectLocation() {
  if (!pending) return;
  chosen = pending;
  input.value = chosen.address ? chosen.name + ', ' + chosen.address : chosen.name;
  preview.style.display = 'none';
}

async function fetchSuggestions(query) {
  try {
    const resp = await fetch('/get_suggestions', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ query }),
    });
    if (!resp.ok) throw new Error('HTTP ' + resp.status);
    renderSuggestions(await resp.json());
  } catch (err) {
    showMessage('Failed to load suggestions.');
  }
}

input.addEventListener('input', () => {
  clearTimeout(debounceTimer);
  const query = input.value.trim();
  if (query.length < MIN_QUERY_CHARS) {
    hideSuggestions();
    return;
  }
  debounceTimer = setTimeout(() => fetchSuggestions(query), DEBOUNCE_MS);
});

document.addEventListener('click', (event) => {
  if (!list.contains(event.target) && event.target !== input) hideSuggestions();
});

function toggleBudgetEditor() {
  const form = document.getElementById('edit-budget-form');
  if (form) form.classList.toggle('hidden');
}

let deleteForm = null;
function askConfirm(form) {
  deleteForm = form;
  document.getElementById('confirm-modal').classList.add('open');
  return false;
}
function closeConfirm() {
  deleteForm = null;
  document.getElementById('confirm-modal').classList.remove('open');
}
function confirmDelete() {
  const form = deleteForm;
  closeConfirm();
  if (form) form.submit();
}
</script>
"#;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn money(amount: Money) -> String {
    format!("{CURRENCY}{amount}")
}

/// Render the whole dashboard page.
pub fn render(snapshot: &DashboardSnapshot) -> String {
    let mut html = String::from(HEAD);
    html.push_str(&tasks_section(&snapshot.tasks));
    html.push_str(&budget_section(snapshot));
    html.push_str("</main>\n");
    html.push_str(MODAL);
    html.push_str(SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

fn tasks_section(tasks: &[Task]) -> String {
    let mut html = String::from(
        r#"<section>
<h2>To-Do List</h2>
<form action="/add_task" method="post" autocomplete="off">
<label for="task-input">Task</label>
<input id="task-input" name="task-input" type="text" placeholder="What needs doing?" required>
<label for="location-input">Location</label>
<input id="location-input" name="location-input" type="text" placeholder="Start typing a place...">
<div id="location-suggestions" class="suggestions"></div>
<div id="map-preview">
<img id="map-image" src="" alt="">
<p id="map-caption" class="sub"></p>
<button type="button" onclick="selectLocation()">Select This Location</button>
</div>
<button type="submit">Add Task</button>
</form>
"#,
    );

    if tasks.is_empty() {
        html.push_str("<p class=\"sub\">No tasks yet. Add one above!</p>\n");
    } else {
        html.push_str("<ul class=\"items\">\n");
        for task in tasks {
            html.push_str(&task_item(task));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");
    html
}

fn task_item(task: &Task) -> String {
    let location = if task.location.is_empty() {
        "No location set".to_string()
    } else {
        escape_html(&task.location)
    };
    format!(
        r#"<li><div><div>{text}</div><div class="sub">{location}</div></div>
<form action="/delete_task/{id}" method="post" onsubmit="return askConfirm(this)"><button type="submit" class="danger">Delete</button></form></li>
"#,
        text = escape_html(&task.text),
        id = escape_html(&task.id),
    )
}

fn budget_section(snapshot: &DashboardSnapshot) -> String {
    let remaining_class = if snapshot.over_budget { "card over" } else { "card" };
    let mut html = format!(
        r#"<section>
<h2>Trip Budget</h2>
<div class="cards">
<div class="card"><div class="sub">Total Budget</div><div class="value">{budget}</div></div>
<div class="card"><div class="sub">Total Spent</div><div class="value">{spent}</div></div>
<div class="{remaining_class}"><div class="sub">Remaining Budget</div><div class="value">{remaining}</div></div>
</div>
"#,
        budget = money(snapshot.total_budget),
        spent = money(snapshot.total_spent),
        remaining = money(snapshot.remaining),
    );

    if snapshot.budget_unset() {
        html.push_str(
            r#"<form action="/set_budget" method="post">
<h3>Set Initial Trip Budget</h3>
<input name="total-budget-input" type="number" step="0.01" min="0" placeholder="e.g. 2500" required>
<button type="submit">Set Budget</button>
</form>
"#,
        );
    } else {
        html.push_str(&format!(
            r#"<button type="button" class="muted" onclick="toggleBudgetEditor()">Edit Budget</button>
<form id="edit-budget-form" class="hidden" action="/set_budget" method="post">
<input name="total-budget-input" type="number" step="0.01" min="0" value="{current}" required>
<button type="submit">Update Budget</button>
</form>
"#,
            current = snapshot.total_budget,
        ));
    }

    html.push_str(
        r#"<h3>Add Expense</h3>
<form action="/add_expense" method="post">
<input name="expense-description" type="text" placeholder="Description" required>
<input name="expense-amount" type="number" step="0.01" min="0" placeholder="Amount" required>
<select name="expense-category">
"#,
    );
    for category in EXPENSE_CATEGORIES {
        html.push_str(&format!("<option value=\"{category}\">{category}</option>\n"));
    }
    html.push_str("</select>\n<button type=\"submit\">Add Expense</button>\n</form>\n");

    if snapshot.expenses.is_empty() {
        html.push_str("<p class=\"sub\">No expenses recorded yet.</p>\n");
    } else {
        html.push_str("<ul class=\"items\">\n");
        for expense in &snapshot.expenses {
            html.push_str(&expense_item(expense));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");
    html
}

fn expense_item(expense: &Expense) -> String {
    format!(
        r#"<li><div><div>{description}</div><div class="sub">{category}</div></div>
<div>{amount}
<form action="/delete_expense/{id}" method="post" style="display:inline" onsubmit="return askConfirm(this)"><button type="submit" class="danger">Delete</button></form></div></li>
"#,
        description = escape_html(&expense.description),
        category = escape_html(&expense.category),
        amount = money(expense.amount),
        id = escape_html(&expense.id),
    )
}
