use sqlx::{Sqlite, query::Query, query::QueryAs};

/// Query builder for constructing SQL queries with dynamic WHERE conditions
///
/// Conditions are collected as pure data and folded into a single
/// `WHERE a AND b AND c` clause; bindings are applied in insertion order.
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
}

#[derive(Clone)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Add a condition with bindings
    pub fn add_condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Add a text binding
    pub fn bind_text(&mut self, value: String) -> &mut Self {
        self.bindings.push(QueryValue::Text(value));
        self
    }

    /// Add an integer binding
    pub fn bind_i64(&mut self, value: i64) -> &mut Self {
        self.bindings.push(QueryValue::Integer(value));
        self
    }

    /// Add a float binding
    pub fn bind_f64(&mut self, value: f64) -> &mut Self {
        self.bindings.push(QueryValue::Float(value));
        self
    }

    /// Add LIKE search condition for multiple fields
    pub fn add_search_condition(&mut self, fields: &[&str], search: &str) -> &mut Self {
        let field_conditions: Vec<String> = fields
            .iter()
            .map(|field| format!("{} LIKE ?", field))
            .collect();

        let condition = format!("({})", field_conditions.join(" OR "));
        self.conditions.push(condition);

        // Add binding for each field
        let search_pattern = format!("%{}%", search);
        for _ in fields {
            self.bindings.push(QueryValue::Text(search_pattern.clone()));
        }

        self
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Number of collected bindings (test/debug aid)
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Apply bindings to a SQLx query
    pub fn apply_bindings<'a, 'b>(
        &'b self,
        mut query: Query<'a, Sqlite, <Sqlite as sqlx::Database>::Arguments<'a>>,
    ) -> Query<'a, Sqlite, <Sqlite as sqlx::Database>::Arguments<'a>>
    where
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Float(f) => query.bind(*f),
            };
        }
        query
    }

    /// Apply bindings to a SQLx query_as
    pub fn apply_bindings_as<'a, 'b, O>(
        &'b self,
        mut query: QueryAs<'a, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'a>>,
    ) -> QueryAs<'a, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'a>>
    where
        O: Send + Unpin,
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Float(f) => query.bind(*f),
            };
        }
        query
    }
}

/// Escape LIKE wildcards in a user-supplied candidate (`%`, `_`, and the
/// escape character itself), for use with `LIKE ? ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '%' || c == '_' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_where_clause() {
        let builder = QueryBuilder::new();
        assert_eq!(builder.build_where_clause(), "");
    }

    #[test]
    fn test_single_condition() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("status = ?")
            .bind_text("pending".to_string());
        assert_eq!(builder.build_where_clause(), " WHERE status = ?");
        assert_eq!(builder.binding_count(), 1);
    }

    #[test]
    fn test_multiple_conditions() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("category = ?")
            .bind_text("Clubes".to_string())
            .add_condition("price >= ?")
            .bind_f64(100.0);
        assert_eq!(
            builder.build_where_clause(),
            " WHERE category = ? AND price >= ?"
        );
    }

    #[test]
    fn test_search_condition() {
        let mut builder = QueryBuilder::new();
        builder.add_search_condition(&["name", "description"], "camisa");
        assert_eq!(
            builder.build_where_clause(),
            " WHERE (name LIKE ? OR description LIKE ?)"
        );
        assert_eq!(builder.binding_count(), 2);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("M"), "M");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
