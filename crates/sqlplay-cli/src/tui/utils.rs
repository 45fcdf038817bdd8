/// Tail of `input` that fits in the bar, plus the cursor column.
pub fn clipped_input(input: &str, total_width: usize, prefix_len: usize) -> (String, u16) {
    let max_len = total_width.saturating_sub(prefix_len + 1);
    let len = input.chars().count();
    if len <= max_len {
        (input.to_string(), len as u16)
    } else {
        let visible: String = input.chars().skip(len - max_len).collect();
        (visible, max_len as u16)
    }
}
