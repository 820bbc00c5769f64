pub fn only_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

pub(crate) fn truncated_digits(value: &str, max: usize) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).take(max).collect()
}
