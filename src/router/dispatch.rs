//! Request dispatch
//!
//! First-match-wins resolution over the route table.

use std::borrow::Cow;

use hyper::body::Bytes;
use hyper::{Request, Uri};
use percent_encoding::percent_decode_str;

use super::{Captures, RegexpHandler, Route};
use crate::http::ResponseWriter;

/// Outcome of a successful lookup: the winning route and its captures
#[derive(Debug)]
pub struct Match<'a> {
    pub route: &'a Route,
    pub captures: Captures,
}

impl Match<'_> {
    /// Run the route's handler, consuming the captures
    pub fn invoke(self, req: &Request<Bytes>, w: &mut ResponseWriter) {
        self.route.handler.handle(req, w, self.captures);
    }
}

/// Percent-decoded path of `uri`, the string routes are matched against.
///
/// A path whose decoded bytes are not valid UTF-8 is returned undecoded.
pub fn request_path(uri: &Uri) -> Cow<'_, str> {
    let raw = uri.path();
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

impl RegexpHandler {
    /// Find the first registered route whose pattern matches all of `path`
    pub fn find(&self, path: &str) -> Option<Match<'_>> {
        self.routes().iter().find_map(|route| {
            route.re.captures(path).map(|caps| Match {
                route,
                captures: Captures::from_regex(&caps),
            })
        })
    }

    /// Serve one request.
    ///
    /// Calls the handler of the first route matching the percent-decoded
    /// request path (see [`request_path`]) and
    /// returns `true`. When nothing matches, no handler runs, `w` is left as
    /// it was and `false` is returned; what to send back in that case is up
    /// to the caller.
    pub fn serve(&self, req: &Request<Bytes>, w: &mut ResponseWriter) -> bool {
        match self.find(&request_path(req.uri())) {
            Some(m) => {
                m.invoke(req, w);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::handler_fn;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(usize, Vec<String>)>>>;

    /// Table whose route `i` records `(i, captures)` when invoked
    fn recording_table(patterns: &[&str]) -> (RegexpHandler, Calls) {
        let calls: Calls = Arc::default();
        let mut table = RegexpHandler::new();
        for (i, pattern) in patterns.iter().enumerate() {
            let calls = Arc::clone(&calls);
            table
                .add(pattern, handler_fn(move |_req, _w, caps| {
                    calls.lock().unwrap().push((i, caps.into_vec()));
                }))
                .unwrap();
        }
        (table, calls)
    }

    fn request(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    fn dispatch(table: &RegexpHandler, path: &str) -> bool {
        table.serve(&request(path), &mut ResponseWriter::new())
    }

    #[test]
    fn test_captures_forwarded() {
        let (table, calls) = recording_table(&["/user/([0-9]+)"]);
        assert!(dispatch(&table, "/user/42"));
        assert_eq!(*calls.lock().unwrap(), vec![(0, vec!["42".to_string()])]);
    }

    #[test]
    fn test_first_registered_wins() {
        let (table, calls) = recording_table(&["/a", "/(a)"]);
        assert!(dispatch(&table, "/a"));
        assert_eq!(*calls.lock().unwrap(), vec![(0, vec![])]);
    }

    #[test]
    fn test_smallest_matching_index_wins() {
        let (table, calls) = recording_table(&["/x", "/api/.*", "/api/(v1)/.*", ".*"]);
        dispatch(&table, "/api/v1/users");
        dispatch(&table, "/other");
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, 1);
        assert_eq!(calls[1].0, 3);
    }

    #[test]
    fn test_no_match_invokes_nothing() {
        let (table, calls) = recording_table(&["/a", "/b/(\\d+)"]);
        let mut w = ResponseWriter::new();
        assert!(!table.serve(&request("/c"), &mut w));
        assert!(calls.lock().unwrap().is_empty());
        assert!(!w.is_touched());
    }

    #[test]
    fn test_empty_table_matches_nothing() {
        let table = RegexpHandler::new();
        assert!(table.find("/").is_none());
        assert!(table.find("").is_none());
    }

    #[test]
    fn test_empty_path() {
        let (table, _) = recording_table(&["a*"]);
        let m = table.find("").expect("a* matches the empty path");
        assert!(m.captures.is_empty());

        let (table, _) = recording_table(&["/.*"]);
        assert!(table.find("").is_none());
    }

    #[test]
    fn test_full_string_anchoring() {
        let (table, _) = recording_table(&["foo"]);
        assert!(table.find("foo").is_some());
        assert!(table.find("foobar").is_none());
        assert!(table.find("xfoo").is_none());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let (table, _) = recording_table(&["/a|/b"]);
        assert!(table.find("/a").is_some());
        assert!(table.find("/b").is_some());
        assert!(table.find("/a/c").is_none());
        assert!(table.find("x/b").is_none());
    }

    #[test]
    fn test_capture_length_and_order() {
        let (table, calls) = recording_table(&["/(\\w+)/(\\d+)/(\\w+)"]);
        dispatch(&table, "/posts/7/comments");
        assert_eq!(
            calls.lock().unwrap()[0].1,
            vec!["posts".to_string(), "7".to_string(), "comments".to_string()]
        );
    }

    #[test]
    fn test_nested_and_optional_groups() {
        let (table, _) = recording_table(&["/files(/(\\w+))?"]);

        let m = table.find("/files/readme").unwrap();
        assert_eq!(&*m.captures, &["/readme".to_string(), "readme".to_string()]);

        // Groups that did not participate are reported as empty strings
        let m = table.find("/files").unwrap();
        assert_eq!(&*m.captures, &[String::new(), String::new()]);
    }

    #[test]
    fn test_handler_writes_response() {
        let mut table = RegexpHandler::new();
        table
            .add("/echo/(.*)", handler_fn(|_req, w, caps| {
                w.write_str(&caps[0]);
            }))
            .unwrap();

        let mut w = ResponseWriter::new();
        assert!(table.serve(&request("/echo/hello"), &mut w));
        assert_eq!(w.body(), b"hello");
    }

    #[test]
    fn test_query_string_is_not_part_of_path() {
        let (table, calls) = recording_table(&["/search"]);
        assert!(dispatch(&table, "/search?q=rust"));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_percent_encoded_path_is_decoded() {
        let (table, calls) =
            recording_table(&["/user/([0-9]+)", "/hello world", "/caf\u{e9}/(.+)"]);
        assert!(dispatch(&table, "/user/%34%32"));
        assert!(dispatch(&table, "/hello%20world"));
        assert!(dispatch(&table, "/caf%C3%A9/a%2Fb"));
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                (0, vec!["42".to_string()]),
                (1, vec![]),
                (2, vec!["a/b".to_string()]),
            ]
        );
    }

    #[test]
    fn test_invalid_utf8_path_matched_raw() {
        let (table, calls) = recording_table(&["/bin/%FF", "/bin/.*"]);
        assert!(dispatch(&table, "/bin/%FF"));
        assert_eq!(calls.lock().unwrap()[0].0, 0);
    }

    #[test]
    fn test_request_path() {
        let uri: Uri = "/a%20b/%E2%9C%93?q=%20".parse().unwrap();
        assert_eq!(request_path(&uri), "/a b/\u{2713}");
        let uri: Uri = "/plain".parse().unwrap();
        assert!(matches!(request_path(&uri), Cow::Borrowed("/plain")));
    }

    #[test]
    #[should_panic(expected = "handler failure")]
    fn test_handler_panic_propagates() {
        let mut table = RegexpHandler::new();
        table
            .add(".*", handler_fn(|_req, _w, _caps| panic!("handler failure")))
            .unwrap();
        dispatch(&table, "/anything");
    }
}
