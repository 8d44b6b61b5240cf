//! Plain-text extraction from uploaded CV files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed for '{file}': {reason}")]
    Pdf { file: String, reason: String },

    #[error("Document '{0}' contains no extractable text")]
    Empty(String),
}

fn is_pdf(bytes: &[u8], file_name: &str) -> bool {
    bytes.starts_with(b"%PDF") || file_name.to_ascii_lowercase().ends_with(".pdf")
}

/// PDFs go through `pdf-extract`; anything else is decoded as (lossy) UTF-8.
pub fn extract_text(bytes: &[u8], file_name: &str) -> Result<String, ExtractError> {
    let text = if is_pdf(bytes, file_name) {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf {
            file: file_name.to_string(),
            reason: e.to_string(),
        })?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::Empty(file_name.to_string()));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through_trimmed() {
        let text = extract_text(b"  Ada Lovelace\nAnalyst  \n", "ada.txt").unwrap();
        assert_eq!(text, "Ada Lovelace\nAnalyst");
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let err = extract_text(b"   \n", "blank.txt").unwrap_err();
        assert!(matches!(err, ExtractError::Empty(name) if name == "blank.txt"));
    }

    #[test]
    fn test_pdf_detection_by_magic_or_extension() {
        assert!(is_pdf(b"%PDF-1.7 ...", "cv.bin"));
        assert!(is_pdf(b"", "CV.PDF"));
        assert!(!is_pdf(b"hello", "cv.txt"));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let text = extract_text(&[b'A', 0xff, b'B'], "odd.txt").unwrap();
        assert!(text.starts_with('A'));
        assert!(text.ends_with('B'));
    }
}
