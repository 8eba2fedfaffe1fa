//! Demo resources and their routes
//!
//! Each demo model is exposed as a RESTful resource with an extra `export`
//! collection route serving CSV and spreadsheet downloads.

use std::fmt;

use convert_case::{Case, Casing};

use crate::error::{ElaineError, Result};

/// A CRUD resource of the demo application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Model name (`PascalCase`)
    pub model: &'static str,
    /// Backing table, also the URL segment
    pub table: &'static str,
    /// Foreign-key columns, rendered as dropdowns by the engine
    pub foreign_keys: &'static [&'static str],
}

/// Every resource in the demo, in migration order
pub const RESOURCES: &[Resource] = &[
    Resource {
        model: "Library",
        table: "libraries",
        foreign_keys: &[],
    },
    Resource {
        model: "Author",
        table: "authors",
        foreign_keys: &[],
    },
    Resource {
        model: "Book",
        table: "books",
        foreign_keys: &["author_id", "library_id"],
    },
    Resource {
        model: "BookCopy",
        table: "book_copies",
        foreign_keys: &["book_id", "library_id"],
    },
    Resource {
        model: "Member",
        table: "members",
        foreign_keys: &["library_id"],
    },
    Resource {
        model: "Loan",
        table: "loans",
        foreign_keys: &["member_id", "book_copy_id"],
    },
    Resource {
        model: "Librarian",
        table: "librarians",
        foreign_keys: &["library_id"],
    },
    Resource {
        model: "Profile",
        table: "profiles",
        foreign_keys: &["member_id"],
    },
    Resource {
        model: "Tag",
        table: "tags",
        foreign_keys: &[],
    },
];

/// Look up a resource by model name, table or URL segment
#[must_use]
pub fn find(name: &str) -> Option<&'static Resource> {
    let snake = name.to_case(Case::Snake);
    RESOURCES
        .iter()
        .find(|r| r.model == name || r.table == name || r.singular() == snake)
}

/// Resources to describe: the named one, or all of them
///
/// # Errors
///
/// Returns [`ElaineError::UnknownResource`] listing the demo tables when
/// `name` matches no resource.
pub fn select(name: Option<&str>) -> Result<Vec<&'static Resource>> {
    let Some(name) = name else {
        return Ok(RESOURCES.iter().collect());
    };

    find(name)
        .map(|resource| vec![resource])
        .ok_or_else(|| ElaineError::UnknownResource {
            name: name.to_string(),
            available: RESOURCES.iter().map(|r| r.table.to_string()).collect(),
        })
}

/// HTTP method of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// Download formats served by the `export` route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// Excel workbook
    Xlsx,
}

impl ExportFormat {
    /// All formats, default first
    pub const ALL: [Self; 2] = [Self::Csv, Self::Xlsx];

    /// File extension and `:format` value
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// One routing table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// HTTP method
    pub verb: HttpVerb,
    /// Path pattern
    pub path: String,
    /// Controller action
    pub action: &'static str,
    /// Route helper name, empty when the path is shared with a named route
    pub name: String,
}

impl Resource {
    /// Singular snake-case name (`book_copy`)
    #[must_use]
    pub fn singular(&self) -> String {
        self.model.to_case(Case::Snake)
    }

    /// Collection path (`/book_copies`)
    #[must_use]
    pub fn collection_path(&self) -> String {
        format!("/{}", self.table)
    }

    /// Export download path for one format (`/books/export.csv`)
    #[must_use]
    pub fn export_path(&self, format: ExportFormat) -> String {
        format!("/{}/export.{}", self.table, format.extension())
    }

    /// Routes in match order
    ///
    /// `export` precedes `show` so `/books/export` is never read as an id.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        let base = self.collection_path();
        let singular = self.singular();
        let route = |verb, path: String, action, name: String| Route {
            verb,
            path,
            action,
            name,
        };

        vec![
            route(
                HttpVerb::Get,
                format!("{base}/export(.:format)"),
                "export",
                format!("export_{}", self.table),
            ),
            route(HttpVerb::Get, base.clone(), "index", self.table.to_string()),
            route(HttpVerb::Post, base.clone(), "create", String::new()),
            route(HttpVerb::Get, format!("{base}/new"), "new", format!("new_{singular}")),
            route(HttpVerb::Get, format!("{base}/:id/edit"), "edit", format!("edit_{singular}")),
            route(HttpVerb::Get, format!("{base}/:id"), "show", singular),
            route(HttpVerb::Patch, format!("{base}/:id"), "update", String::new()),
            route(HttpVerb::Delete, format!("{base}/:id"), "destroy", String::new()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_has_eight_routes_with_export_before_show() {
        for resource in RESOURCES {
            let routes = resource.routes();
            assert_eq!(routes.len(), 8, "{}", resource.model);

            let position = |action| routes.iter().position(|r| r.action == action).unwrap();
            assert!(position("export") < position("show"));
        }
    }

    #[test]
    fn test_book_copy_routes() {
        let resource = find("BookCopy").unwrap();
        let routes = resource.routes();

        assert_eq!(resource.singular(), "book_copy");
        assert_eq!(routes[0].path, "/book_copies/export(.:format)");
        assert_eq!(routes[0].name, "export_book_copies");
        assert_eq!(routes[3].name, "new_book_copy");
        assert_eq!(routes[5].path, "/book_copies/:id");
        assert_eq!(routes[5].name, "book_copy");
        assert_eq!(routes[7].verb, HttpVerb::Delete);
    }

    #[test]
    fn test_find_by_any_name() {
        assert_eq!(find("books").unwrap().model, "Book");
        assert_eq!(find("book_copy").unwrap().table, "book_copies");
        assert_eq!(find("Library").unwrap().table, "libraries");
        assert!(find("Publisher").is_none());
    }

    #[test]
    fn test_export_paths() {
        let books = find("Book").unwrap();
        let paths: Vec<String> = ExportFormat::ALL
            .into_iter()
            .map(|format| books.export_path(format))
            .collect();
        assert_eq!(paths, vec!["/books/export.csv", "/books/export.xlsx"]);
    }

    #[test]
    fn test_select_all_or_one() {
        assert_eq!(select(None).unwrap().len(), RESOURCES.len());

        let selected = select(Some("book_copies")).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].model, "BookCopy");
    }

    #[test]
    fn test_select_unknown_lists_tables() {
        match select(Some("publishers")).unwrap_err() {
            ElaineError::UnknownResource { name, available } => {
                assert_eq!(name, "publishers");
                assert_eq!(available.len(), RESOURCES.len());
                assert!(available.contains(&"loans".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
