use std::fmt;

/// The six ways this harness constructs a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReqPattern {
    /// Streamed body with its exact size declared up front.
    SizedStream,
    /// Streamed body with no declared size.
    PlainStream,
    /// Streamed body with a wrong Content-Length header set directly.
    WrongLen,
    /// Body read fully into memory before sending.
    Buffered,
    /// Buffered body with Transfer-Encoding: chunked forced on.
    ExplicitChunked,
    /// File wrapped in a multipart form, fully buffered.
    Multipart,
}

impl ReqPattern {
    /// Execution order of one run.
    pub const ALL: &'static [Self] = &[
        Self::SizedStream,
        Self::PlainStream,
        Self::WrongLen,
        Self::Buffered,
        Self::ExplicitChunked,
        Self::Multipart,
    ];

    /// Patterns that have to stat the file for its byte size.
    pub fn needs_len(&self) -> bool {
        matches!(self, Self::SizedStream | Self::WrongLen)
    }
}

impl fmt::Display for ReqPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self {
            Self::SizedStream => "single-part stream with Content-Length",
            Self::PlainStream => "single-part stream without Content-Length",
            Self::WrongLen => {
                "single-part stream with wrong Content-Length (setting the header directly)"
            }
            Self::Buffered => "single-part, body buffered in memory",
            Self::ExplicitChunked => {
                "single-part buffered, setting 'Transfer-Encoding: chunked' explicitly"
            }
            Self::Multipart => "multipart",
        };
        write!(f, "{desc}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_pattern_once() {
        assert_eq!(ReqPattern::ALL.len(), 6);
        for (i, a) in ReqPattern::ALL.iter().enumerate() {
            for b in &ReqPattern::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn only_sized_patterns_need_the_file_size() {
        for pattern in ReqPattern::ALL {
            let expected = matches!(pattern, ReqPattern::SizedStream | ReqPattern::WrongLen);
            assert_eq!(pattern.needs_len(), expected, "{pattern}");
        }
    }

    #[test]
    fn descriptions_name_the_framing() {
        assert!(ReqPattern::SizedStream.to_string().contains("Content-Length"));
        assert!(ReqPattern::WrongLen.to_string().contains("wrong Content-Length"));
        assert!(
            ReqPattern::ExplicitChunked
                .to_string()
                .contains("Transfer-Encoding: chunked")
        );
        assert_eq!(ReqPattern::Multipart.to_string(), "multipart");
    }
}
