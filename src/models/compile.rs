use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::{fake_asm, AsmLine, BufferId, FilterSet};

/// Milliseconds since the Unix epoch, used to stamp outbound requests and
/// measure round-trip time.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Immutable snapshot of everything one compile needs. Doubles as the wire
/// payload and as the correlation key for the eventual response.
///
/// `source_buffer` identifies the panel-side origin and stays off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileRequest {
    #[serde(skip)]
    pub source_buffer: BufferId,
    pub source: String,
    pub compiler: String,
    pub options: String,
    pub filters: FilterSet,
    #[serde(rename = "timestamp")]
    pub issued_at: u64,
}

/// Service response. A missing `asm` means no output; `code` is the
/// service-reported status, recorded for logging and never branched on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    #[serde(default)]
    pub asm: Option<Vec<AsmLine>>,
    #[serde(default)]
    pub code: Option<i32>,
}

impl CompileResult {
    /// Wraps a failure message as a result, so transport errors flow through
    /// the same rendering path as real responses.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            asm: Some(fake_asm(text)),
            code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_shape_matches_service_contract() {
        let request = CompileRequest {
            source_buffer: BufferId(1),
            source: "int main() {}".to_string(),
            compiler: "gcc".to_string(),
            options: "-O2".to_string(),
            filters: ["labels".to_string()].into_iter().collect(),
            issued_at: 1234,
        };
        let value = serde_json::to_value(&request).expect("encode request");
        assert_eq!(
            value,
            json!({
                "source": "int main() {}",
                "compiler": "gcc",
                "options": "-O2",
                "filters": { "labels": true },
                "timestamp": 1234,
            })
        );
    }

    #[test]
    fn response_without_asm_decodes_to_none() {
        let result: CompileResult = serde_json::from_str(r#"{"code":0}"#).expect("decode");
        assert_eq!(result.asm, None);
        assert_eq!(result.code, Some(0));
    }

    #[test]
    fn response_asm_lines_decode_in_order() {
        let result: CompileResult = serde_json::from_str(
            r#"{"asm":[{"text":"main:","source":null},{"text":"  ret","source":1}],"code":0}"#,
        )
        .expect("decode");
        let asm = result.asm.expect("asm present");
        assert_eq!(asm.len(), 2);
        assert_eq!(asm[0].text, "main:");
        assert_eq!(asm[1].source_line, Some(1));
    }

    #[test]
    fn error_result_is_single_synthetic_line() {
        let result = CompileResult::error("Remote compilation failed: timeout");
        let asm = result.asm.expect("asm present");
        assert_eq!(asm.len(), 1);
        assert!(asm[0].synthetic);
        assert_eq!(asm[0].text, "Remote compilation failed: timeout");
        assert_eq!(result.code, None);
    }
}
