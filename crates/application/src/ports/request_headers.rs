//! Request header access port
//!
//! The engine only needs to look up override headers on the incoming
//! request; everything else about the request stays with the pipeline.

use std::collections::HashMap;

/// Read-only view of an incoming request's headers
pub trait RequestHeaders {
    /// Value of the named header, if present
    ///
    /// Header names are case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;
}

impl<H: RequestHeaders + ?Sized> RequestHeaders for &H {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

impl<S: std::hash::BuildHasher> RequestHeaders for HashMap<String, String, S> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }
}

impl RequestHeaders for [(&str, &str)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Request without headers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeaders;

impl RequestHeaders for NoHeaders {
    fn header(&self, _name: &str) -> Option<&str> {
        None
    }
}
