// src/common/listing.rs

// Busca, filtro e paginação das tabelas do painel.
// Toda tabela segue o mesmo fluxo: backend -> filtro local -> busca -> página.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

pub const PAGE_SIZES: [usize; 3] = [5, 10, 15];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Campos (1 ou 2) em que a busca de texto livre atua para cada tipo de linha.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Busca por substring, sem diferenciar maiúsculas. Termo vazio casa com tudo.
pub fn matches_search(fields: &[&str], term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

pub fn filter_by_search<T, F>(rows: Vec<T>, term: &str, fields: F) -> Vec<T>
where
    F: Fn(&T) -> Vec<&str>,
{
    rows.into_iter()
        .filter(|row| matches_search(&fields(row), term))
        .collect()
}

pub fn filter_searchable<T: Searchable>(rows: Vec<T>, term: &str) -> Vec<T> {
    filter_by_search(rows, term, |row| row.search_fields())
}

// Parâmetros comuns de toda listagem: ?search=&page=&perPage=
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Texto livre
    pub search: Option<String>,
    /// Página (1-based)
    pub page: Option<usize>,
    /// Linhas por página: 5, 10 ou 15
    pub per_page: Option<usize>,
}

impl ListQuery {
    pub fn term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> Result<usize, AppError> {
        match self.per_page {
            None => Ok(DEFAULT_PAGE_SIZE),
            Some(size) if PAGE_SIZES.contains(&size) => Ok(size),
            Some(size) => Err(AppError::InvalidPageSize(size)),
        }
    }

    /// Busca + paginação numa tacada só.
    pub fn apply<T, F>(&self, rows: Vec<T>, fields: F) -> Result<Page<T>, AppError>
    where
        F: Fn(&T) -> Vec<&str>,
    {
        let per_page = self.page_size()?;
        let rows = filter_by_search(rows, self.term(), fields);
        Ok(paginate(rows, self.page(), per_page))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub first_index: usize,
    pub last_index: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            first_index: self.first_index,
            last_index: self.last_index,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

pub fn paginate<T>(rows: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = rows.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);
    let items: Vec<T> = rows.into_iter().skip(start).take(end.saturating_sub(start)).collect();

    let (first_index, last_index) = if total == 0 { (0, 0) } else { (start + 1, end) };

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
        first_index,
        last_index,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}

// Linha de tabela + ações habilitadas no estado atual dela.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionRow<T, A> {
    #[serde(flatten)]
    pub item: T,
    pub actions: Vec<A>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_list_has_one_page_and_zero_indices() {
        let page = paginate(Vec::<u32>::new(), 3, 10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!((page.first_index, page.last_index), (0, 0));
        assert!(!page.has_previous && !page.has_next);
    }

    #[test]
    fn last_page_is_partial() {
        let page = paginate((1..=23).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!((page.first_index, page.last_index), (21, 23));
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn page_size_outside_the_allowed_set_is_rejected() {
        let query = ListQuery { per_page: Some(7), ..Default::default() };
        assert!(matches!(query.page_size(), Err(AppError::InvalidPageSize(7))));
        assert_eq!(ListQuery::default().page_size().unwrap(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(matches_search(&["42", "JuanPerez"], "juanp"));
        assert!(matches_search(&["42", "JuanPerez"], "4"));
        assert!(!matches_search(&["42", "JuanPerez"], "maria"));
        assert!(matches_search(&["42", "JuanPerez"], "   "));
    }

    proptest! {
        #[test]
        fn pages_cover_every_row_exactly_once(total in 0usize..80, size_idx in 0usize..3) {
            let per_page = PAGE_SIZES[size_idx];
            let rows: Vec<usize> = (0..total).collect();
            let pages = total.div_ceil(per_page).max(1);

            let mut seen = Vec::new();
            for p in 1..=pages {
                let page = paginate(rows.clone(), p, per_page);
                prop_assert_eq!(page.total_pages, pages);
                prop_assert!(page.items.len() <= per_page);
                if total > 0 {
                    prop_assert_eq!(page.last_index - page.first_index + 1, page.items.len());
                }
                seen.extend(page.items);
            }
            prop_assert_eq!(seen, rows);
        }

        #[test]
        fn requested_page_is_clamped(total in 0usize..60, page in 0usize..100) {
            let result = paginate((0..total).collect::<Vec<_>>(), page, 5);
            prop_assert!(result.page >= 1 && result.page <= result.total_pages);
        }

        #[test]
        fn search_result_is_the_matching_subset(
            names in proptest::collection::vec("[a-zA-Z]{0,8}", 0..30),
            term in "[a-zA-Z]{0,3}",
        ) {
            let found = filter_by_search(names.clone(), &term, |n: &String| vec![n.as_str()]);
            let needle = term.to_lowercase();
            let expected: Vec<String> = names
                .into_iter()
                .filter(|n| n.to_lowercase().contains(&needle))
                .collect();
            prop_assert_eq!(found, expected);
        }
    }
}
