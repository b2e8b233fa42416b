pub const POST_FULL: &str = r##"---
title: "Designing with Constraints"
date: 2025-01-20
description: "Why limits make better work"
tags: ["design", "process", "career"]
coverImage: "/images/constraints.jpg"
draft: false
---

Constraints are not the enemy of creativity. Every brief I have loved came with
a short deadline, a tiny budget or an odd set of rules.

## Start from the edges

Write down what you cannot do before you write down what you want to do.
"##;

pub const POST_MINIMAL: &str = r##"---
---

Just content, no frontmatter.
"##;

pub const POST_DRAFT: &str = r##"---
title: "Half-baked thoughts"
date: 2025-02-01
tags: ["process"]
draft: true
---

Not ready yet.
"##;

pub fn post_with(title: &str, date: &str, tags: &[&str], draft: bool) -> String {
    let tags: Vec<String> = tags.iter().map(|t| format!("\"{}\"", t)).collect();
    format!(
        "---\ntitle: \"{}\"\ndate: {}\ndescription: \"About {}\"\ntags: [{}]\ndraft: {}\n---\n\nThis is the post content.\n",
        title,
        date,
        title,
        tags.join(", "),
        draft
    )
}

pub const FEED_JSON: &str = r##"{
  "version": "https://jsonfeed.org/version/1",
  "title": "Test Blog",
  "home_page_url": "https://micro.blog/test",
  "feed_url": "https://micro.blog/feed.json?username=test",
  "items": [
    {
      "id": "123",
      "content_html": "<p>Hello world</p>",
      "date_published": "2025-01-15T10:00:00Z",
      "url": "https://micro.blog/test/123"
    },
    {
      "id": "456",
      "content_html": "<p>Another note</p>",
      "date_published": "2025-01-14T10:00:00Z",
      "url": "https://micro.blog/test/456",
      "image": "https://example.com/photo.jpg"
    },
    {
      "id": 789,
      "content_html": "<p>Now playing <a href=\"https://open.spotify.com/track/4iV5W9uYEdYUVa79Axb7Rh\">this</a></p>",
      "date_published": "2025-01-13T10:00:00Z",
      "url": "https://micro.blog/test/789",
      "attachments": [
        { "url": "https://example.com/attached.jpg", "mime_type": "image/jpeg" },
        { "url": "https://example.com/second.jpg", "mime_type": "image/jpeg" }
      ]
    }
  ]
}"##;
