//! SQL identifier quoting utilities

/// Quote a SQL identifier, doubling embedded double quotes.
///
/// # Examples
/// ```
/// use sdm_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("db_upgrade"), r#""db_upgrade""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name, one component at a time.
///
/// # Examples
/// ```
/// use sdm_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("db_upgrade"), r#""db_upgrade""#);
/// assert_eq!(quote_qualified("meta.db_upgrade"), r#""meta"."db_upgrade""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}
