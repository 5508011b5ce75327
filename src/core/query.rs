//! Page requests and paged results

use crate::config::PaginationConfig;
use crate::core::entity::{Entity, EntityField};
use crate::core::error::QueryError;
use std::cmp::Ordering;

/// Sort direction of a single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One `sort=field[,asc|desc]` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F: EntityField> Sort<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    /// Parse `field`, `field,asc` or `field,desc`
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidSort {
            value: value.to_string(),
        };
        let mut parts = value.split(',').map(str::trim);
        let field = parts
            .next()
            .and_then(F::from_name)
            .ok_or_else(invalid)?;
        let direction = match parts.next() {
            None | Some("asc") | Some("ASC") => Direction::Asc,
            Some("desc") | Some("DESC") => Direction::Desc,
            Some(_) => return Err(invalid()),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { field, direction })
    }
}

/// Zero-based page request with an ordered list of sort keys
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<F> {
    pub page: usize,
    pub size: usize,
    pub sort: Vec<Sort<F>>,
}

impl<F: EntityField> PageRequest<F> {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Sort<F>) -> Self {
        self.sort.push(sort);
        self
    }

    /// Read `page`, `size` and repeated `sort` from query pairs.
    ///
    /// Other parameters are left for the criteria parser.
    pub fn from_query_pairs(
        pairs: &[(String, String)],
        pagination: &PaginationConfig,
    ) -> Result<Self, QueryError> {
        let mut request = Self::new(0, pagination.default_size);
        for (key, value) in pairs {
            match key.as_str() {
                "page" => request.page = parse_count(key, value)?,
                "size" => {
                    request.size = parse_count(key, value)?.clamp(1, pagination.max_size.max(1))
                }
                "sort" => request.sort.push(Sort::parse(value)?),
                _ => {}
            }
        }
        let offset = request
            .page
            .checked_mul(request.size)
            .filter(|offset| i64::try_from(*offset).is_ok());
        if offset.is_none() {
            return Err(QueryError::InvalidValue {
                parameter: "page".to_string(),
                value: request.page.to_string(),
                message: format!("page * size must not exceed {}", i64::MAX),
            });
        }
        Ok(request)
    }

    /// Number of records to skip
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Order two entities by the sort keys, then by ascending id
    pub fn compare<E: Entity<Field = F>>(&self, a: &E, b: &E) -> Ordering {
        self.sort
            .iter()
            .map(|sort| {
                let ordering = a
                    .field_value(sort.field)
                    .sort_cmp(&b.field_value(sort.field));
                match sort.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id().cmp(&b.id()))
    }
}

fn parse_count(parameter: &str, value: &str) -> Result<usize, QueryError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| QueryError::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// One page of results plus the total across all pages
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page number
    pub number: usize,
    pub size: usize,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, number: usize, size: usize, total_elements: u64) -> Self {
        Self {
            content,
            number,
            size: size.max(1),
            total_elements,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }

    pub fn total_pages(&self) -> usize {
        (self.total_elements as usize).div_ceil(self.size)
    }

    pub fn has_next(&self) -> bool {
        self.number
            .saturating_add(1)
            .saturating_mul(self.size)
            < self.total_elements as usize
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }
}
