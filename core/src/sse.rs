//! Stream Frame Decoder
//!
//! Incremental decoder for the backend's `text/event-stream` responses.
//! Network delivery boundaries never align with logical frame boundaries:
//! a frame, or even a single multi-byte character, may be split across two
//! deliveries. The decoder therefore buffers raw bytes across calls and only
//! parses fragments once their terminating blank line has arrived.
//!
//! # Wire format
//!
//! ```text
//! id: 0
//! event: message
//! data: {"content":"The paper proposes..."}
//!
//! data: [DONE]
//! ```
//!
//! Only `data:` lines carry meaning here; other field lines are transport
//! framing and are ignored. Multiple `data:` lines in one frame join with a
//! newline so payloads may span lines.
//!
//! # Lifecycle
//!
//! One decoder instance per exchange. Frames are emitted in input order, and
//! after a terminal frame (`Done` or in-band `Error`) the decoder latches:
//! any further input is discarded. Malformed payloads are skipped with a
//! diagnostic and never abort decoding of later well-formed frames.

use serde::Deserialize;

/// Sentinel payload signalling normal end-of-stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded unit of the push stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SseFrame {
    /// Incremental answer text.
    Content(String),
    /// In-band fatal failure reported by the server.
    Error(String),
    /// Terminal sentinel; no further frames follow.
    Done,
}

impl SseFrame {
    /// Whether this frame ends the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Content(_))
    }
}

/// Recognized payload shape.
///
/// Extra fields the server attaches (e.g. `formatted`) are ignored; a
/// payload with neither recognized field is skipped.
#[derive(Debug, Deserialize)]
struct Payload {
    content: Option<String>,
    error: Option<String>,
}

/// Stateful incremental frame decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Undecoded bytes carried across deliveries.
    buffer: Vec<u8>,
    /// Set once a terminal frame has been emitted.
    finished: bool,
}

impl SseDecoder {
    /// Create a decoder with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a terminal frame has been emitted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one raw delivery and collect the frames it completes.
    ///
    /// The trailing (possibly incomplete) fragment stays buffered for the
    /// next call. After a terminal frame everything further is discarded,
    /// including the remainder of the current delivery.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some((end, sep_len)) = find_frame_boundary(&self.buffer) {
            let fragment: Vec<u8> = self.buffer.drain(..end + sep_len).collect();
            let text = String::from_utf8_lossy(&fragment[..end]);

            if let Some(frame) = parse_fragment(&text) {
                let terminal = frame.is_terminal();
                frames.push(frame);
                if terminal {
                    self.finished = true;
                    self.buffer.clear();
                    break;
                }
            }
        }
        frames
    }
}

/// Locate the first blank line in `buf`.
///
/// Returns the byte offset where the fragment ends and the separator length.
/// Tolerates LF and CRLF line breaks, including a mix of the two around the
/// blank line.
fn find_frame_boundary(buf: &[u8]) -> Option<(usize, usize)> {
    const SEPARATORS: [&[u8]; 4] = [b"\r\n\r\n", b"\r\n\n", b"\n\r\n", b"\n\n"];

    for i in 0..buf.len() {
        let rest = &buf[i..];
        for sep in SEPARATORS {
            if rest.starts_with(sep) {
                return Some((i, sep.len()));
            }
        }
    }
    None
}

/// Parse one complete fragment into a frame.
///
/// Returns `None` for fragments carrying nothing recognizable: no `data:`
/// lines, an empty payload, malformed JSON, or a JSON object without a
/// `content`/`error` field.
fn parse_fragment(fragment: &str) -> Option<SseFrame> {
    let mut data_lines: Vec<&str> = Vec::new();
    for line in fragment.lines() {
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.trim_start());
        }
    }
    if data_lines.is_empty() {
        return None;
    }

    let joined = data_lines.join("\n");
    let payload = joined.trim_end();
    if payload.is_empty() {
        return None;
    }
    if payload == DONE_SENTINEL {
        return Some(SseFrame::Done);
    }

    match serde_json::from_str::<Payload>(payload) {
        Ok(Payload {
            error: Some(message),
            ..
        }) => Some(SseFrame::Error(message)),
        Ok(Payload {
            content: Some(text),
            ..
        }) => Some(SseFrame::Content(text)),
        Ok(_) => {
            tracing::debug!(payload, "skipping frame with no recognized fields");
            None
        }
        Err(err) => {
            tracing::debug!(%err, payload, "skipping malformed frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_all(chunks: &[&[u8]]) -> Vec<SseFrame> {
        let mut decoder = SseDecoder::new();
        let mut frames = Vec::new();
        for chunk in chunks {
            frames.extend(decoder.feed(chunk));
        }
        frames
    }

    fn decode_text(chunks: &[&str]) -> Vec<SseFrame> {
        let chunks: Vec<&[u8]> = chunks.iter().map(|c| c.as_bytes()).collect();
        decode_all(&chunks)
    }

    #[test]
    fn test_single_content_frame() {
        let frames = decode_text(&["data: {\"content\":\"Hello\"}\n\n"]);
        assert_eq!(frames, vec![SseFrame::Content("Hello".to_string())]);
    }

    #[test]
    fn test_content_then_done() {
        let frames = decode_text(&["data: {\"content\":\"Hello\"}\n\ndata: [DONE]\n\n"]);
        assert_eq!(
            frames,
            vec![SseFrame::Content("Hello".to_string()), SseFrame::Done]
        );
    }

    #[test]
    fn test_frame_split_across_deliveries() {
        let frames = decode_text(&["data: {\"con", "tent\":\"Hello\"}\n\ndata: [DONE]\n\n"]);
        assert_eq!(
            frames,
            vec![SseFrame::Content("Hello".to_string()), SseFrame::Done]
        );
    }

    #[test]
    fn test_split_inside_multibyte_char() {
        let full = "data: {\"content\":\"r\u{e9}sum\u{e9}\"}\n\n".as_bytes();
        // 0xC3 0xA9 is the UTF-8 encoding of e-acute; split between the bytes.
        let at = full
            .iter()
            .position(|&b| b == 0xC3)
            .expect("fixture contains a multi-byte char");
        let frames = decode_all(&[&full[..at + 1], &full[at + 1..]]);
        assert_eq!(
            frames,
            vec![SseFrame::Content("r\u{e9}sum\u{e9}".to_string())]
        );
    }

    #[test]
    fn test_crlf_framing() {
        let frames =
            decode_text(&["data: {\"content\":\"Hi\"}\r\n\r\ndata: [DONE]\r\n\r\n"]);
        assert_eq!(
            frames,
            vec![SseFrame::Content("Hi".to_string()), SseFrame::Done]
        );
    }

    #[test]
    fn test_mixed_line_breaks() {
        let frames = decode_text(&["data: {\"content\":\"Hi\"}\r\n\ndata: [DONE]\n\n"]);
        assert_eq!(
            frames,
            vec![SseFrame::Content("Hi".to_string()), SseFrame::Done]
        );
    }

    #[test]
    fn test_multiline_payload_joined() {
        // A JSON payload may span multiple data: lines; they join with \n.
        let frames = decode_text(&["data: {\"content\":\ndata: \"Hello\"}\n\n"]);
        assert_eq!(frames, vec![SseFrame::Content("Hello".to_string())]);
    }

    #[test]
    fn test_error_frame() {
        let frames = decode_text(&["data: {\"error\":\"rate limited\"}\n\n"]);
        assert_eq!(frames, vec![SseFrame::Error("rate limited".to_string())]);
    }

    #[test]
    fn test_error_field_wins_over_content() {
        let frames =
            decode_text(&["data: {\"content\":\"partial\",\"error\":\"boom\"}\n\n"]);
        assert_eq!(frames, vec![SseFrame::Error("boom".to_string())]);
    }

    #[test]
    fn test_malformed_frame_skipped() {
        let frames = decode_text(&[
            "data: not-json\n\ndata: {\"content\":\"ok\"}\n\ndata: [DONE]\n\n",
        ]);
        assert_eq!(
            frames,
            vec![SseFrame::Content("ok".to_string()), SseFrame::Done]
        );
    }

    #[test]
    fn test_unrecognized_fields_skipped() {
        let frames = decode_text(&[
            "data: {\"formatted\":true}\n\ndata: {\"content\":\"ok\"}\n\n",
        ]);
        assert_eq!(frames, vec![SseFrame::Content("ok".to_string())]);
    }

    #[test]
    fn test_extra_fields_alongside_content_ignored() {
        let frames =
            decode_text(&["data: {\"content\":\"ok\",\"formatted\":true}\n\n"]);
        assert_eq!(frames, vec![SseFrame::Content("ok".to_string())]);
    }

    #[test]
    fn test_non_data_lines_ignored() {
        let frames = decode_text(&[
            "id: 0\nevent: message\ndata: {\"content\":\"Hi\"}\n\n",
        ]);
        assert_eq!(frames, vec![SseFrame::Content("Hi".to_string())]);
    }

    #[test]
    fn test_empty_payload_skipped() {
        let frames = decode_text(&["data:\n\ndata: {\"content\":\"Hi\"}\n\n"]);
        assert_eq!(frames, vec![SseFrame::Content("Hi".to_string())]);
    }

    #[test]
    fn test_done_latches_decoder() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: [DONE]\n\ndata: {\"content\":\"late\"}\n\n");
        assert_eq!(frames, vec![SseFrame::Done]);
        assert!(decoder.is_finished());
        assert_eq!(decoder.feed(b"data: {\"content\":\"later\"}\n\n"), vec![]);
    }

    #[test]
    fn test_error_latches_decoder() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: {\"error\":\"boom\"}\n\ndata: {\"content\":\"x\"}\n\n");
        assert_eq!(frames, vec![SseFrame::Error("boom".to_string())]);
        assert!(decoder.is_finished());
    }

    #[test]
    fn test_incomplete_fragment_held_back() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.feed(b"data: {\"content\":\"Hi\"}\n"), vec![]);
        assert_eq!(
            decoder.feed(b"\n"),
            vec![SseFrame::Content("Hi".to_string())]
        );
    }

    #[test]
    fn test_sentinel_split_across_deliveries() {
        let frames = decode_text(&["data: [DO", "NE]\n\n"]);
        assert_eq!(frames, vec![SseFrame::Done]);
    }

    /// Reassembly invariant: any partition of the byte stream yields the
    /// same frame sequence as a single delivery.
    #[test]
    fn test_reassembly_invariant_every_split_point() {
        let fixture = "id: 0\r\nevent: message\r\ndata: {\"content\":\"caf\u{e9} \"}\r\n\r\n\
                       data: not-json\n\n\
                       data: {\"content\":\"au lait\"}\n\n\
                       data: [DONE]\n\n"
            .as_bytes();
        let expected = decode_all(&[fixture]);
        assert_eq!(
            expected,
            vec![
                SseFrame::Content("caf\u{e9} ".to_string()),
                SseFrame::Content("au lait".to_string()),
                SseFrame::Done,
            ]
        );

        for split in 1..fixture.len() {
            let frames = decode_all(&[&fixture[..split], &fixture[split..]]);
            assert_eq!(frames, expected, "split at byte {split}");
        }
    }

    #[test]
    fn test_reassembly_invariant_byte_by_byte() {
        let fixture = b"data: {\"content\":\"Hello\"}\n\ndata: [DONE]\n\n";
        let singles: Vec<&[u8]> = fixture.chunks(1).collect();
        assert_eq!(
            decode_all(&singles),
            vec![SseFrame::Content("Hello".to_string()), SseFrame::Done]
        );
    }
}
