//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use crate::parser::{
        parse_request, Error, HttpVersion, Method, ParseState, ParserLimits, RequestParser,
    };

    fn feed_whole(input: &[u8]) -> RequestParser {
        let mut parser = RequestParser::new();
        parser.feed(input);
        parser
    }

    fn feed_bytewise(input: &[u8]) -> RequestParser {
        let mut parser = RequestParser::new();
        for byte in input {
            parser.feed(std::slice::from_ref(byte));
        }
        parser
    }

    #[test]
    fn test_parse_simple_get_request() {
        let parser = feed_whole(b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.method(), Method::GET);
        assert_eq!(parser.version(), HttpVersion::Http11);
        assert_eq!(parser.target(), "/a");
        assert_eq!(parser.headers().get("host"), Some("x"));
        assert!(parser.body().is_empty());
    }

    #[test]
    fn test_request_line_split_across_feeds() {
        let mut parser = RequestParser::new();
        parser.feed(b"DEL");
        assert_eq!(parser.state(), ParseState::RequestLine);
        parser.feed(b"ETE /items/3 HT");
        assert_eq!(parser.state(), ParseState::RequestLine);
        parser.feed(b"TP/1.0\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.method(), Method::DELETE);
        assert_eq!(parser.version(), HttpVersion::Http10);
    }

    #[test]
    fn test_fragmentation_independence() {
        let inputs: Vec<&[u8]> = vec![
            b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n",
            b"POST /up HTTP/1.1\r\nHost: x\r\nContent-Length: 5\r\n\r\nhello",
            b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\nX-Tail: 1\r\n\r\n",
            b"GET /a HTTP/1.1\r\nNoColon\r\n\r\n",
            b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n",
            b"HEAD /q?x=1 HTTP/1.0\r\nA: 1\r\nA: 2\r\n\r\n",
        ];
        for input in inputs {
            let whole = feed_whole(input);
            let bytewise = feed_bytewise(input);
            assert_eq!(whole.state(), bytewise.state());
            assert_eq!(whole.error(), bytewise.error());
            assert_eq!(whole.method(), bytewise.method());
            assert_eq!(whole.version(), bytewise.version());
            assert_eq!(whole.target(), bytewise.target());
            assert_eq!(whole.headers(), bytewise.headers());
            assert_eq!(whole.body(), bytewise.body());
        }
    }

    #[test]
    fn test_unknown_method_is_not_an_error() {
        let parser = feed_whole(b"PATCH /a HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.method(), Method::Unknown);
    }

    #[test]
    fn test_unknown_version_is_not_an_error() {
        let parser = feed_whole(b"GET /a HTTP/2.0\r\nHost: x\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.version(), HttpVersion::Unknown);
    }

    #[test]
    fn test_method_matching_is_case_sensitive() {
        let parser = feed_whole(b"get /a HTTP/1.1\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.method(), Method::Unknown);
    }

    #[test]
    fn test_version_grammar_violation() {
        let parser = feed_whole(b"GET /a FTP/1.1\r\n\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::InvalidMethodOrVersionGrammar(token)) if token == "FTP/1.1"
        ));

        let parser = feed_whole(b"GET /a HTTP/11\r\n\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::InvalidMethodOrVersionGrammar(_))
        ));
    }

    #[test]
    fn test_method_grammar_violation() {
        let parser = feed_whole(b"G{}ET /a HTTP/1.1\r\n\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::InvalidMethodOrVersionGrammar(_))
        ));
    }

    #[test]
    fn test_malformed_request_line() {
        let parser = feed_whole(b"GET\r\n");
        assert_eq!(parser.state(), ParseState::Failed);
        assert!(matches!(
            parser.error(),
            Some(Error::MalformedRequestLine(line)) if line == "GET"
        ));

        let parser = feed_whole(b"GET /a HTTP/1.1 junk\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::MalformedRequestLine(_))
        ));
    }

    #[test]
    fn test_missing_version_token_scans_as_unknown() {
        let parser = feed_whole(b"GET /a\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.method(), Method::GET);
        assert_eq!(parser.version(), HttpVersion::Unknown);
    }

    #[test]
    fn test_blank_lines_before_request_line_are_skipped() {
        let parser = feed_whole(b"\r\n\r\nGET /a HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.target(), "/a");
    }

    #[test]
    fn test_header_without_colon() {
        let parser = feed_whole(b"GET /a HTTP/1.1\r\nNoColon\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Failed);
        assert!(matches!(
            parser.error(),
            Some(Error::MalformedHeaderLine(line)) if line == "NoColon"
        ));
    }

    #[test]
    fn test_header_name_with_whitespace() {
        let parser = feed_whole(b"GET /a HTTP/1.1\r\nBad Name: x\r\n\r\n");
        assert!(matches!(parser.error(), Some(Error::MalformedHeaderLine(_))));
    }

    #[test]
    fn test_case_insensitive_headers() {
        let parser = feed_whole(b"GET /a HTTP/1.1\r\nHoSt: example.com\r\n\r\n");
        let request = parser.request();
        assert_eq!(request.get_header("host"), Some("example.com"));
        assert_eq!(request.get_header("HOST"), Some("example.com"));
        assert!(request.has_header("Host"));
        assert!(!request.has_header("nonexistent"));
    }

    #[test]
    fn test_repeated_headers_keep_arrival_order() {
        let parser = feed_whole(b"GET /a HTTP/1.1\r\nAccept: text/html\r\nAccept: text/plain\r\n\r\n");
        assert_eq!(
            parser.headers().get_all("accept"),
            &["text/html".to_string(), "text/plain".to_string()]
        );
        assert_eq!(parser.headers().get("accept"), Some("text/html"));
    }

    #[test]
    fn test_header_value_trimming_and_colons() {
        let parser = feed_whole(b"GET /a HTTP/1.1\r\nHost: localhost:8080 \r\nX-Empty:\r\n\r\n");
        assert_eq!(parser.headers().get("host"), Some("localhost:8080"));
        assert_eq!(parser.headers().get("x-empty"), Some(""));
    }

    #[test]
    fn test_bare_lf_line_endings_tolerated() {
        let parser = feed_whole(b"GET /a HTTP/1.1\nHost: x\nContent-Length: 2\n\nok");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.body(), b"ok");
    }

    #[test]
    fn test_content_length_body() {
        let parser = feed_whole(b"POST /up HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.request().content_length, Some(5));
        assert_eq!(parser.body(), b"hello");
    }

    #[test]
    fn test_zero_content_length_completes_without_body() {
        let parser = feed_whole(b"POST /up HTTP/1.1\r\nContent-Length: 0\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert!(parser.body().is_empty());
    }

    #[test]
    fn test_excess_body_bytes_stay_unconsumed() {
        let parser = feed_whole(b"POST /up HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.body(), b"hello");
        assert_eq!(parser.residue(), b"EXTRA");
    }

    #[test]
    fn test_truncated_body_fails_on_finish() {
        let mut parser = RequestParser::new();
        parser.feed(b"POST /up HTTP/1.1\r\nContent-Length: 5\r\n\r\nfour");
        assert_eq!(parser.state(), ParseState::Body);
        parser.finish();
        assert_eq!(parser.state(), ParseState::Failed);
        assert_eq!(parser.error(), Some(&Error::UnexpectedConnectionClose));
        assert_eq!(parser.body(), b"four");
    }

    #[test]
    fn test_finish_before_any_input() {
        let mut parser = RequestParser::new();
        assert!(parser.is_idle());
        parser.finish();
        assert_eq!(parser.error(), Some(&Error::UnexpectedConnectionClose));
    }

    #[test]
    fn test_invalid_content_length() {
        let parser = feed_whole(b"POST /up HTTP/1.1\r\nContent-Length: abc\r\n\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::InvalidContentLength(value)) if value == "abc"
        ));

        let parser = feed_whole(b"POST /up HTTP/1.1\r\nContent-Length: -1\r\n\r\n");
        assert!(matches!(parser.error(), Some(Error::InvalidContentLength(_))));
    }

    #[test]
    fn test_conflicting_content_lengths() {
        let parser =
            feed_whole(b"POST /up HTTP/1.1\r\nContent-Length: 4\r\nContent-Length: 5\r\n\r\n");
        assert_eq!(
            parser.error(),
            Some(&Error::DuplicateConflictingLengthHeaders)
        );
    }

    #[test]
    fn test_repeated_identical_content_lengths_accepted() {
        let parser = feed_whole(
            b"POST /up HTTP/1.1\r\nContent-Length: 2\r\nContent-Length: 2\r\n\r\nok",
        );
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.body(), b"ok");
    }

    #[test]
    fn test_content_length_with_chunked_is_rejected_before_body() {
        let parser = feed_whole(
            b"POST /up HTTP/1.1\r\nContent-Length: 4\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n",
        );
        assert_eq!(
            parser.error(),
            Some(&Error::DuplicateConflictingLengthHeaders)
        );
        assert!(parser.body().is_empty());
    }

    #[test]
    fn test_chunked_body() {
        let parser =
            feed_whole(b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n0\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert!(parser.request().chunked);
        assert_eq!(parser.body(), b"Wiki");
    }

    #[test]
    fn test_chunked_multiple_chunks_and_extensions() {
        let parser = feed_whole(
            b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4;ext=1\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
        );
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.body(), b"Wikipedia");
    }

    #[test]
    fn test_chunked_trailers_merged_into_headers() {
        let parser = feed_whole(
            b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n0\r\nX-Checksum: abc\r\n\r\n",
        );
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.headers().get("x-checksum"), Some("abc"));
    }

    #[test]
    fn test_malformed_chunk_size() {
        let parser = feed_whole(b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::MalformedChunkSize(token)) if token == "zz"
        ));
    }

    #[test]
    fn test_chunk_length_mismatch() {
        let parser = feed_whole(
            b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWikipedia\r\n0\r\n\r\n",
        );
        assert_eq!(parser.error(), Some(&Error::ChunkLengthMismatch));
    }

    #[test]
    fn test_chunked_transfer_encoding_detection_is_case_insensitive() {
        let parser =
            feed_whole(b"POST /c HTTP/1.1\r\nTransfer-Encoding: Chunked\r\n\r\n2\r\nok\r\n0\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.body(), b"ok");
    }

    #[test]
    fn test_pipelined_requests_via_reset() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET /a HTTP/1.1\r\nHost: x\r\n\r\nPOST /b HTTP/1.1\r\nContent-Length: 2\r\n\r\nok");

        let first = parser.take_request().unwrap();
        assert_eq!(first.target, "/a");
        assert!(first.body.is_empty());

        parser.reset();
        assert_eq!(parser.state(), ParseState::Complete);
        let second = parser.take_request().unwrap();
        assert_eq!(second.target, "/b");
        assert_eq!(second.body, b"ok");
        assert!(!second.headers.contains("host"));
    }

    #[test]
    fn test_reset_resumes_a_partial_pipelined_request() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET /a HTTP/1.1\r\nHost: x\r\n\r\nGET /b HT");
        parser.take_request().unwrap();

        parser.reset();
        assert_eq!(parser.state(), ParseState::RequestLine);
        parser.feed(b"TP/1.1\r\nHost: y\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Complete);
        assert_eq!(parser.target(), "/b");
    }

    #[test]
    fn test_take_request_only_once() {
        let mut parser = feed_whole(b"GET /a HTTP/1.1\r\n\r\n");
        assert!(parser.take_request().is_some());
        assert!(parser.take_request().is_none());
    }

    #[test]
    fn test_input_after_failure_is_dropped() {
        let mut parser = feed_whole(b"GET\r\n");
        assert_eq!(parser.state(), ParseState::Failed);
        let error = parser.error().cloned();
        parser.feed(b"GET /a HTTP/1.1\r\n\r\n");
        assert_eq!(parser.state(), ParseState::Failed);
        assert_eq!(parser.error().cloned(), error);
        assert_eq!(parser.residue(), b"");
    }

    #[test]
    fn test_request_line_limit() {
        let limits = ParserLimits {
            max_request_line_bytes: 16,
            ..ParserLimits::default()
        };
        let mut parser = RequestParser::with_limits(limits);
        parser.feed(b"GET /aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert!(matches!(
            parser.error(),
            Some(Error::RequestTooLarge { what: "request line", .. })
        ));
    }

    #[test]
    fn test_declared_body_over_limit() {
        let limits = ParserLimits {
            max_body_bytes: 8,
            ..ParserLimits::default()
        };
        let mut parser = RequestParser::with_limits(limits);
        parser.feed(b"POST /up HTTP/1.1\r\nContent-Length: 100\r\n\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::RequestTooLarge { what: "body", .. })
        ));
    }

    #[test]
    fn test_chunked_body_over_limit() {
        let limits = ParserLimits {
            max_body_bytes: 6,
            ..ParserLimits::default()
        };
        let mut parser = RequestParser::with_limits(limits);
        parser.feed(b"POST /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n4\r\npedi\r\n");
        assert!(matches!(
            parser.error(),
            Some(Error::RequestTooLarge { what: "body", .. })
        ));
    }

    #[test]
    fn test_parse_request_one_shot() {
        let request =
            parse_request(b"POST /up HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\n\r\nhello")
                .unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.target, "/up");
        assert_eq!(request.get_header("host"), Some("example.com"));
        assert_eq!(request.body, b"hello");
    }

    #[test]
    fn test_parse_request_incomplete_input() {
        let result = parse_request(b"GET /a HTTP/1.1\r\nHost: x\r\n");
        assert!(matches!(result, Err(Error::UnexpectedConnectionClose)));
    }

    #[test]
    fn test_parse_request_empty_input() {
        let result = parse_request(b"");
        assert!(matches!(result, Err(Error::UnexpectedConnectionClose)));
    }

    #[test]
    fn test_parse_request_propagates_parse_errors() {
        let result = parse_request(b"GET /a HTTP/1.1\r\nNoColon\r\n\r\n");
        assert!(matches!(result, Err(Error::MalformedHeaderLine(_))));
    }

    #[test]
    fn test_target_stays_raw_and_query_helpers_split_it() {
        let request = parse_request(b"GET /search?q=rust&page=1 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.target, "/search?q=rust&page=1");
        assert_eq!(request.path(), "/search");

        let params = request.query_params();
        assert_eq!(params.get("q"), Some(&"rust".to_string()));
        assert_eq!(params.get("page"), Some(&"1".to_string()));
    }

    #[test]
    fn test_json_body() {
        #[derive(Deserialize)]
        struct User {
            name: String,
        }

        let request = parse_request(
            b"POST /users HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 15\r\n\r\n{\"name\":\"John\"}",
        )
        .unwrap();
        assert!(request.is_json());
        let user: User = request.json().unwrap();
        assert_eq!(user.name, "John");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::GET.to_string(), "GET");
        assert_eq!(Method::POST.to_string(), "POST");
        assert_eq!(Method::DELETE.to_string(), "DELETE");
        assert_eq!(Method::HEAD.to_string(), "HEAD");
        assert_eq!(Method::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_http_version_display() {
        assert_eq!(HttpVersion::Http10.to_string(), "HTTP/1.0");
        assert_eq!(HttpVersion::Http11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::Unknown.to_string(), "UNKNOWN");
    }
}
