//! Summary statistics over a list of blogs.
//!
//! Every function is pure and keeps the input order meaningful: ties are
//! always resolved in favour of whatever appears first.

use serde::Serialize;

use crate::entities::blog::Blog;

/// Number of blogs written by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlogs {
    pub author: Option<String>,
    pub blogs: usize,
}

pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().map(|blog| blog.likes).sum()
}

/// The most liked blog, or `None` for an empty list.
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    blogs.iter().reduce(|best, blog| {
        if blog.likes > best.likes { blog } else { best }
    })
}

/// Distinct authors in order of first appearance.
pub fn get_authors(blogs: &[Blog]) -> Vec<&str> {
    let mut authors: Vec<&str> = Vec::new();
    for blog in blogs {
        if !authors.contains(&blog.author.as_str()) {
            authors.push(&blog.author);
        }
    }
    authors
}

/// Case-sensitive count of blogs by `author`.
pub fn blogs_by_author(blogs: &[Blog], author: &str) -> AuthorBlogs {
    let count = blogs.iter().filter(|blog| blog.author == author).count();
    AuthorBlogs {
        author: Some(author.to_string()),
        blogs: count,
    }
}

/// The author with the most blogs. On equal counts the author seen first wins.
pub fn most_blogs(blogs: &[Blog]) -> AuthorBlogs {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for blog in blogs {
        match counts.iter_mut().find(|(author, _)| *author == blog.author) {
            Some((_, count)) => *count += 1,
            None => counts.push((blog.author.as_str(), 1)),
        }
    }

    counts
        .into_iter()
        .reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
        .map(|(author, count)| AuthorBlogs {
            author: Some(author.to_string()),
            blogs: count,
        })
        .unwrap_or(AuthorBlogs { author: None, blogs: 0 })
}
