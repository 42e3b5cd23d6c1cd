// src/models/patch.rs

//! Partial updates for collection entities.
//!
//! Every set field overwrites the matching field of the existing record,
//! unset fields keep their current value.

use crate::models::{AgendaCategory, AgendaFields, ArticleFields, MemberFields};

/// A shallow partial update of `T`.
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}

fn set<V>(slot: &mut V, value: Option<V>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgendaPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub category: Option<AgendaCategory>,
}

impl Patch<AgendaFields> for AgendaPatch {
    fn apply(self, target: &mut AgendaFields) {
        set(&mut target.title, self.title);
        set(&mut target.date, self.date);
        set(&mut target.time, self.time);
        set(&mut target.location, self.location);
        set(&mut target.description, self.description);
        set(&mut target.category, self.category);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl Patch<ArticleFields> for ArticlePatch {
    fn apply(self, target: &mut ArticleFields) {
        set(&mut target.title, self.title);
        set(&mut target.excerpt, self.excerpt);
        set(&mut target.content, self.content);
        set(&mut target.author, self.author);
        set(&mut target.date, self.date);
        set(&mut target.image, self.image);
        set(&mut target.category, self.category);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub order: Option<u32>,
}

impl Patch<MemberFields> for MemberPatch {
    fn apply(self, target: &mut MemberFields) {
        set(&mut target.name, self.name);
        set(&mut target.title, self.title);
        set(&mut target.image, self.image);
        set(&mut target.order, self.order.map(Some));
    }
}
