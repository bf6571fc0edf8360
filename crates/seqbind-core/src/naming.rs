//! Identifier rules shared by the model and the generators.

/// Go exportedness: the first character is an uppercase letter
///
/// # Examples
/// ```
/// use seqbind_core::naming::is_exported;
/// assert!(is_exported("Counter"));
/// assert!(!is_exported("counter"));
/// assert!(!is_exported("_Counter"));
/// assert!(!is_exported(""));
/// ```
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Local binding name for the `index`-th parameter
///
/// Named parameters keep their name; anonymous ones (`_` or missing) are
/// numbered so every parameter gets a distinct binding.
///
/// # Examples
/// ```
/// use seqbind_core::naming::param_name;
/// assert_eq!(param_name(Some("delta"), 0), "delta");
/// assert_eq!(param_name(None, 2), "p2");
/// assert_eq!(param_name(Some("_"), 1), "p1");
/// ```
pub fn param_name(name: Option<&str>, index: usize) -> String {
    match name {
        Some(n) if !n.is_empty() && n != "_" => n.to_string(),
        _ => format!("p{}", index),
    }
}
