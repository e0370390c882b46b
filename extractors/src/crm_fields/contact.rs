use shared_types::ContactParts;

/// Guess first name, last name and email from a free-text contact line.
///
/// Tokens are split on whitespace and commas. The first token containing
/// `@` is the email; the remaining tokens, in order, give the names. This is
/// lossy: `"Dr. Jane Doe"` yields `Dr.` as the first name.
pub fn split_contact(text: &str) -> ContactParts {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .collect();

    let email = tokens.iter().find(|token| token.contains('@')).copied();

    let mut names = tokens
        .iter()
        .filter(|token| Some(**token) != email)
        .map(|token| token.to_string());

    ContactParts {
        first_name: names.next(),
        last_name: names.next(),
        email: email.map(|e| e.to_string()),
    }
}
