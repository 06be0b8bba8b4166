#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoginError {
    EmptyName,
    NameTaken,
}

// One display name per connection; names are freed on disconnect. The caller
// supplies the names of the *other* connected clients, so re-submitting one's
// own current name is idempotent.
pub fn validate_player_name<'a>(
    name: &str, mut taken_names: impl Iterator<Item = &'a str>,
) -> Result<(), LoginError> {
    if name.is_empty() {
        return Err(LoginError::EmptyName);
    }
    if taken_names.any(|taken| taken == name) {
        return Err(LoginError::NameTaken);
    }
    Ok(())
}
