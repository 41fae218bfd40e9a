//! Résumé text extraction — converts an uploaded PDF into plain text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF could not be read: {0}")]
    Unreadable(#[from] pdf_extract::OutputError),

    #[error("PDF contained no extractable text")]
    NoText,
}

/// Extracts plain text from in-memory PDF bytes.
///
/// A structurally valid PDF with no text layer (e.g. a pure scan) is
/// treated as a failure: the pipeline has nothing to ground questions on.
pub fn text_from_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes)?;
    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_from_pdf_rejects_junk_bytes() {
        let result = text_from_pdf(b"this is not a pdf");
        assert!(matches!(result, Err(ExtractError::Unreadable(_))));
    }

    #[test]
    fn test_text_from_pdf_rejects_empty_input() {
        let result = text_from_pdf(&[]);
        assert!(result.is_err());
    }
}
