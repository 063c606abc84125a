// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

pub mod article;
pub mod catalog;
pub mod category;
pub mod config;
pub mod contact;
pub mod donation;
pub mod feed;
pub mod highlight;
pub mod metadata;
pub mod notice;
pub mod pages;
pub mod query;
pub mod share;
pub mod site;
pub mod sitemap;
pub mod slug;
pub mod template;
