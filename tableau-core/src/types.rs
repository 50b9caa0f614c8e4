use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The four workflow columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// "Pense bête": ideas and someday items.
    Backlog,
    /// "À faire"
    Todo,
    /// "En cours"
    InProgress,
    /// "Terminé"
    Done,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Backlog,
        Column::Todo,
        Column::InProgress,
        Column::Done,
    ];

    /// Column key as stored on disk and submitted by forms.
    pub fn name(self) -> &'static str {
        match self {
            Column::Backlog => "Pense bête",
            Column::Todo => "À faire",
            Column::InProgress => "En cours",
            Column::Done => "Terminé",
        }
    }

    /// Exact (case and accent sensitive) lookup by column key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn slot(self) -> usize {
        match self {
            Column::Backlog => 0,
            Column::Todo => 1,
            Column::InProgress => 2,
            Column::Done => 3,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Keys with a typed field on [`Ticket`].
const TICKET_FIELDS: [&str; 4] = ["title", "comment", "category", "date"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    pub title: String,
    pub comment: String,
    pub category: Option<i64>,
    /// Due date, expected as `YYYY-MM-DD`. Kept as text so malformed values
    /// survive a load/save cycle untouched.
    pub date: Option<String>,
    /// Every other key found on the persisted ticket object, plus known keys
    /// whose value had an unexpected type (e.g. `"category": "2"`).
    pub extra: Map<String, Value>,
}

impl Ticket {
    pub fn new(title: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            comment: comment.into(),
            ..Self::default()
        }
    }

    /// Build a ticket from a persisted object. Values of the wrong type stay
    /// in `extra` verbatim, so only non-objects are rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        let mut extra = value.as_object()?.clone();
        let mut ticket = Ticket::default();

        if let Some(Value::String(title)) = extra.get("title") {
            ticket.title = title.clone();
            extra.remove("title");
        }
        if let Some(Value::String(comment)) = extra.get("comment") {
            ticket.comment = comment.clone();
            extra.remove("comment");
        }
        if let Some(id) = extra.get("category").and_then(Value::as_i64) {
            ticket.category = Some(id);
            extra.remove("category");
        }
        if let Some(Value::String(date)) = extra.get("date") {
            ticket.date = Some(date.clone());
            extra.remove("date");
        }

        ticket.extra = extra;
        Some(ticket)
    }

    /// Set or clear the category, discarding any unparsed stored value.
    pub fn set_category(&mut self, category: Option<i64>) {
        self.extra.remove("category");
        self.category = category;
    }

    /// Set or clear the due date, discarding any unparsed stored value.
    pub fn set_date(&mut self, date: Option<String>) {
        self.extra.remove("date");
        self.date = date;
    }
}

impl Serialize for Ticket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        // A typed value wins; otherwise an unparsed stored value is written back.
        match self.extra.get("title") {
            Some(raw) if self.title.is_empty() => map.serialize_entry("title", raw)?,
            _ => map.serialize_entry("title", &self.title)?,
        }
        match self.extra.get("comment") {
            Some(raw) if self.comment.is_empty() => map.serialize_entry("comment", raw)?,
            _ => map.serialize_entry("comment", &self.comment)?,
        }
        match (&self.category, self.extra.get("category")) {
            (Some(id), _) => map.serialize_entry("category", id)?,
            (None, Some(raw)) => map.serialize_entry("category", raw)?,
            (None, None) => {}
        }
        match (&self.date, self.extra.get("date")) {
            (Some(date), _) => map.serialize_entry("date", date)?,
            (None, Some(raw)) => map.serialize_entry("date", raw)?,
            (None, None) => {}
        }
        for (key, value) in &self.extra {
            if !TICKET_FIELDS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Ticket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ticket::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("ticket must be a JSON object"))
    }
}

/// Tickets grouped by column. Always holds exactly the four official columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    columns: [Vec<Ticket>; 4],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tickets(&self, column: Column) -> &[Ticket] {
        &self.columns[column.slot()]
    }

    pub fn tickets_mut(&mut self, column: Column) -> &mut Vec<Ticket> {
        &mut self.columns[column.slot()]
    }

    /// Columns with their tickets, in display order.
    pub fn columns(&self) -> impl Iterator<Item = (Column, &[Ticket])> {
        Column::ALL
            .into_iter()
            .map(move |c| (c, self.columns[c.slot()].as_slice()))
    }

    pub fn all_tickets_mut(&mut self) -> impl Iterator<Item = &mut Ticket> {
        self.columns.iter_mut().flat_map(|tickets| tickets.iter_mut())
    }

    pub fn total_tickets(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Build a board from an arbitrary persisted JSON value.
    ///
    /// Unknown keys are dropped, missing or non-list columns become empty, and
    /// entries that are not ticket objects are skipped.
    pub fn from_value(value: &Value) -> Self {
        let mut board = Self::new();
        let Some(object) = value.as_object() else {
            log::warn!(
                target: "tableau.storage",
                "Ticket document is not a JSON object, starting from an empty board"
            );
            return board;
        };

        for key in object.keys() {
            if Column::from_name(key).is_none() {
                log::debug!(target: "tableau.storage", "Dropping unknown column {:?}", key);
            }
        }

        for column in Column::ALL {
            let Some(entries) = object.get(column.name()).and_then(Value::as_array) else {
                continue;
            };
            let tickets = board.tickets_mut(column);
            for entry in entries {
                match Ticket::from_value(entry) {
                    Some(ticket) => tickets.push(ticket),
                    None => log::warn!(
                        target: "tableau.storage",
                        "Skipping non-object ticket in column {}: {}",
                        column,
                        entry
                    ),
                }
            }
        }
        board
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Column::ALL.len()))?;
        for (column, tickets) in self.columns() {
            map.serialize_entry(column.name(), tickets)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Board::from_value(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
}

impl Category {
    /// Build a category from a persisted entry. Only the integer id is
    /// required; a missing or mistyped name or color reads as empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self {
            id: object.get("id").and_then(Value::as_i64)?,
            name: text("name"),
            color: text("color"),
        })
    }
}

/// Partial category update: only the fields present are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_lookup_is_exact() {
        assert_eq!(Column::from_name("À faire"), Some(Column::Todo));
        assert_eq!(Column::from_name("Terminé"), Some(Column::Done));
        assert_eq!(Column::from_name("a faire"), None);
        assert_eq!(Column::from_name(" En cours"), None);
    }

    #[test]
    fn test_unknown_column_dropped_and_missing_initialized() {
        let raw = json!({
            "À faire": [{ "title": "Write report", "comment": "" }],
            "Archive": [{ "title": "Old", "comment": "" }],
        });
        let board = Board::from_value(&raw);
        assert_eq!(board.tickets(Column::Todo).len(), 1);
        assert!(board.tickets(Column::Backlog).is_empty());
        assert!(board.tickets(Column::Done).is_empty());

        let out = serde_json::to_value(&board).unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert!(out.get("Archive").is_none());
    }

    #[test]
    fn test_non_list_column_reads_as_empty() {
        let raw = json!({ "En cours": "nope", "Terminé": [1, { "title": "ok" }] });
        let board = Board::from_value(&raw);
        assert!(board.tickets(Column::InProgress).is_empty());
        assert_eq!(board.tickets(Column::Done).len(), 1);
        assert_eq!(board.tickets(Column::Done)[0].comment, "");
    }

    #[test]
    fn test_serialized_columns_keep_display_order() {
        let text = serde_json::to_string(&Board::new()).unwrap();
        assert_eq!(
            text,
            r#"{"Pense bête":[],"À faire":[],"En cours":[],"Terminé":[]}"#
        );
    }

    #[test]
    fn test_ticket_extra_fields_survive() {
        let raw = json!({ "title": "T", "comment": "c", "owner": "me" });
        let ticket: Ticket = serde_json::from_value(raw).unwrap();
        assert_eq!(ticket.extra.get("owner"), Some(&json!("me")));

        let back = serde_json::to_value(&ticket).unwrap();
        assert_eq!(back, json!({ "title": "T", "comment": "c", "owner": "me" }));
    }

    #[test]
    fn test_mistyped_ticket_fields_kept_verbatim() {
        let raw = json!({ "title": "keep me", "comment": "", "category": "2" });
        let ticket = Ticket::from_value(&raw).unwrap();
        assert_eq!(ticket.title, "keep me");
        assert_eq!(ticket.category, None);
        assert_eq!(serde_json::to_value(&ticket).unwrap(), raw);

        let float = json!({ "title": "b", "comment": "", "category": 2.0, "date": 20240110 });
        let ticket = Ticket::from_value(&float).unwrap();
        assert_eq!(ticket.date, None);
        assert_eq!(serde_json::to_value(&ticket).unwrap(), float);
    }

    #[test]
    fn test_typed_value_replaces_unparsed_one() {
        let raw = json!({ "title": 7, "comment": "", "category": "2", "date": null });
        let mut ticket = Ticket::from_value(&raw).unwrap();
        assert_eq!(serde_json::to_value(&ticket).unwrap(), raw);

        ticket.title = "renamed".to_string();
        ticket.set_category(Some(3));
        ticket.set_date(None);
        assert_eq!(
            serde_json::to_value(&ticket).unwrap(),
            json!({ "title": "renamed", "comment": "", "category": 3 })
        );
    }

    #[test]
    fn test_category_from_incomplete_entry() {
        let cat = Category::from_value(&json!({ "id": 2, "name": "No color" })).unwrap();
        assert_eq!(cat.name, "No color");
        assert_eq!(cat.color, "");
        assert!(Category::from_value(&json!({ "id": "2", "name": "x" })).is_none());
        assert!(Category::from_value(&json!("Urgent")).is_none());
    }

    #[test]
    fn test_optional_ticket_fields_omitted() {
        let ticket = Ticket::new("Title", "");
        let back = serde_json::to_value(&ticket).unwrap();
        assert_eq!(back, json!({ "title": "Title", "comment": "" }));
    }
}
