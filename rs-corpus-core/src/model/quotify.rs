use super::generator::TERMINATOR;

/// Formats raw generator output for display.
///
/// - splits the token stream into sentences at `.` tokens
/// - capitalizes the first letter of each sentence
/// - attaches `,` and `.` to the preceding word
///
/// `"the cat sat . the dog ran ."` becomes `"The cat sat. The dog ran."`
pub fn quotify(raw: &str) -> String {
	quotify_with(raw, TERMINATOR)
}

/// [`quotify`] with a custom sentence terminator.
pub fn quotify_with(raw: &str, terminator: &str) -> String {
	let mut quoted = String::with_capacity(raw.len());
	let mut sentence_start = true;

	for token in raw.split_whitespace() {
		if !quoted.is_empty() && !token.starts_with([',', '.']) {
			quoted.push(' ');
		}
		if sentence_start {
			quoted.push_str(&capitalize(token));
		} else {
			quoted.push_str(token);
		}
		sentence_start = token == terminator;
	}

	quoted
}

fn capitalize(token: &str) -> String {
	let mut chars = token.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
