//! Embedded page shells.
//!
//! The wiki serves four HTML shells (index, login, new page, editor) baked
//! into the binary with typed `__VAR__` substitution. Woven artifacts are
//! never templated; they are served byte-for-byte as the weaver produced
//! them.
//!
//! # Usage
//!
//! ```ignore
//! use embed::pages::{INDEX_HTML, IndexVars};
//!
//! let html = INDEX_HTML.render(&IndexVars { site_title: "wiki", note: "" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod pages {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for index.html.
    pub struct IndexVars<'a> {
        pub site_title: &'a str,
        /// One-line status shown under the heading ("Logged in successfully").
        pub note: &'a str,
    }

    impl TemplateVars for IndexVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SITE_TITLE__", &escape(self.site_title))
                .replace("__NOTE__", &escape(self.note))
        }
    }

    /// Landing page shell.
    pub const INDEX_HTML: Template<IndexVars<'static>> =
        Template::new(include_str!("pages/index.html"));

    /// Variables for login.html.
    pub struct LoginVars<'a> {
        pub site_title: &'a str,
        pub note: &'a str,
    }

    impl TemplateVars for LoginVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SITE_TITLE__", &escape(self.site_title))
                .replace("__NOTE__", &escape(self.note))
        }
    }

    /// Login form shell.
    pub const LOGIN_HTML: Template<LoginVars<'static>> =
        Template::new(include_str!("pages/login.html"));

    /// Variables for submit.html (create form, empty editor).
    pub struct SubmitVars<'a> {
        pub site_title: &'a str,
        pub title: &'a str,
        pub note: &'a str,
    }

    impl TemplateVars for SubmitVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SITE_TITLE__", &escape(self.site_title))
                .replace("__TITLE__", &escape(self.title))
                .replace("__NOTE__", &escape(self.note))
        }
    }

    /// New-page form shell.
    pub const SUBMIT_HTML: Template<SubmitVars<'static>> =
        Template::new(include_str!("pages/submit.html"));

    /// Variables for edit.html (editor pre-filled with stored source).
    pub struct EditVars<'a> {
        pub site_title: &'a str,
        pub title: &'a str,
        pub content: &'a str,
    }

    impl TemplateVars for EditVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SITE_TITLE__", &escape(self.site_title))
                .replace("__TITLE__", &escape(self.title))
                .replace("__CONTENT__", &escape(self.content))
        }
    }

    /// Editor shell.
    pub const EDIT_HTML: Template<EditVars<'static>> =
        Template::new(include_str!("pages/edit.html"));
}
