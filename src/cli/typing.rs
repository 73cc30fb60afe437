//! Word-by-word reveal of chat answers.

use std::io::Write;
use std::time::Duration;

/// Write `text` to `writer` one space-separated word at a time, pausing
/// `delay` after each word. The bytes written equal `text`.
pub async fn reveal<W: Write>(writer: &mut W, text: &str, delay: Duration) -> std::io::Result<()> {
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            write!(writer, " ")?;
        }
        write!(writer, "{}", word)?;
        writer.flush()?;

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reveal_preserves_text() {
        let text = "Replace the pads.\n\nThis response is based on  [a](b).";
        let mut out = Vec::new();
        reveal(&mut out, text, Duration::ZERO).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);
    }

    #[tokio::test]
    async fn test_reveal_pauses_per_word() {
        let mut out = Vec::new();
        let start = std::time::Instant::now();
        reveal(&mut out, "one two three", Duration::from_millis(20))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(out, b"one two three");
    }
}
