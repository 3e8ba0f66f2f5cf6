// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pagination helpers for Kubernetes API list operations.
//!
//! Counting objects only needs the item count of each page, so pages are
//! dropped as soon as they have been counted.

use super::retry::retry_api_call;
use crate::constants::KUBE_LIST_PAGE_SIZE;
use crate::errors::Result;
use kube::core::ObjectList;
use kube::{api::ListParams, Api, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Count all resources visible through `api`, fetching them page by page.
///
/// Each page request is retried on transient errors within `retry_budget`.
///
/// # Arguments
///
/// * `api` - Kubernetes API client for the resource type
/// * `list_params` - Base list parameters (labels, fields, etc.)
/// * `operation_name` - Human-readable name for logging
/// * `retry_budget` - Time budget for retries of each page
///
/// # Errors
///
/// Returns an error if Kubernetes API operations fail.
pub async fn count_all_paginated<K>(
    api: &Api<K>,
    list_params: ListParams,
    operation_name: &str,
    retry_budget: Duration,
) -> Result<usize>
where
    K: Resource + Clone + DeserializeOwned + Debug,
{
    count_pages(
        list_params,
        |params| {
            let api = api.clone();
            async move { api.list(&params).await }
        },
        operation_name,
        retry_budget,
    )
    .await
}

/// Follow continue tokens through `fetch_page`, summing the items of each page.
///
/// `fetch_page` receives the parameters for the next page: the page size is
/// always [`KUBE_LIST_PAGE_SIZE`] and the continue token is set from the
/// previous page. Counting stops at the first page without a token.
///
/// # Errors
///
/// Returns an error if a page cannot be fetched within `retry_budget`.
pub async fn count_pages<K, F, Fut>(
    mut list_params: ListParams,
    mut fetch_page: F,
    operation_name: &str,
    retry_budget: Duration,
) -> Result<usize>
where
    F: FnMut(ListParams) -> Fut,
    Fut: Future<Output = std::result::Result<ObjectList<K>, kube::Error>>,
    K: Clone,
{
    list_params.limit = Some(KUBE_LIST_PAGE_SIZE);

    let mut total_items = 0;
    let mut page_count = 0;

    loop {
        page_count += 1;
        let result = retry_api_call(
            || fetch_page(list_params.clone()),
            operation_name,
            retry_budget,
        )
        .await?;

        let item_count = result.items.len();
        total_items += item_count;

        debug!(
            operation = operation_name,
            page = page_count,
            items_in_page = item_count,
            total_items = total_items,
            "Fetched page from Kubernetes API"
        );

        match result.metadata.continue_ {
            Some(continue_token) if !continue_token.is_empty() => {
                list_params.continue_token = Some(continue_token);
            }
            _ => break,
        }
    }

    debug!(
        operation = operation_name,
        total_pages = page_count,
        total_items = total_items,
        "Completed paginated count"
    );

    Ok(total_items)
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod pagination_tests;
