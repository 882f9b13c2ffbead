/// PostgREST query string builder (`?col=eq.val&order=...`).
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.pairs.retain(|(k, _)| k != "select");
        self.pairs.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.pairs.push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Case-insensitive equality.
    pub fn ilike_exact(mut self, column: &str, value: &str) -> Self {
        self.pairs
            .push((column.to_string(), format!("ilike.{}", like_literal(&sanitize_term(value)))));
        self
    }

    pub fn in_list<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((column.to_string(), format!("in.({})", joined)));
        self
    }

    /// Matches rows where any of `columns` contains `term`, case-insensitively.
    pub fn search_any(mut self, columns: &[&str], term: &str) -> Self {
        let term = sanitize_term(term);
        if term.is_empty() {
            return self;
        }
        let term = like_literal(&term);
        let ors = columns
            .iter()
            .map(|c| format!("{}.ilike.*{}*", c, term))
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push(("or".to_string(), format!("({})", ors)));
        self
    }

    pub fn order(mut self, column: &str, descending: bool) -> Self {
        let dir = if descending { "desc" } else { "asc" };
        self.pairs.push(("order".to_string(), format!("{}.{}", column, dir)));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.pairs.push(("limit".to_string(), n.to_string()));
        self
    }

    pub fn has_select(&self) -> bool {
        self.pairs.iter().any(|(k, _)| k == "select")
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Strips characters that carry meaning in PostgREST filter syntax.
pub fn sanitize_term(term: &str) -> String {
    term.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '%' | '"' | '\\'))
        .collect()
}

/// Escapes `_` so it matches itself under ILIKE instead of any character.
fn like_literal(term: &str) -> String {
    term.replace('_', "\\_")
}
