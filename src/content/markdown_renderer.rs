use markdown::Options;

use crate::content::ContentError;

pub fn render_markdown(md_text: &str) -> Result<String, ContentError> {
    let buf = remove_comments(md_text)?;
    markdown::to_html_with_options(buf.as_str(), &Options::gfm())
        .map_err(|e| ContentError::Render(e.reason.to_string()))
}

pub fn remove_comments(md_post: &str) -> Result<String, ContentError> {
    let mut res: String = String::new();
    let mut slice = Some(md_post);

    let start_comment = "<!--";
    let end_comment = "-->";

    while let Some(block) = slice {
        let md_buf: &str = match block.find(start_comment) {
            Some(start) => {
                let to_render: &str = &block[0..start];

                let next: &str = &block[(start + start_comment.len())..];
                match next.find(end_comment) {
                    Some(end) => {
                        slice = Some(&next[(end + end_comment.len())..]);
                    }
                    None => {
                        return Err(ContentError::Render("Error finding end of comment".to_string()));
                    }
                };

                to_render
            }
            None => {
                slice = None;
                block
            }
        };
        res.push_str(md_buf);
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_comments() {
        let res = remove_comments("Some text.<!-- more -->Wo<!-- xyz -->rd").unwrap();
        assert_eq!(res, "Some text.Word");

        assert_eq!(remove_comments("Some text.Word").unwrap(), "Some text.Word");
        assert_eq!(remove_comments("").unwrap(), "");
        assert_eq!(remove_comments("<!-- more --><!-- xyz -->").unwrap(), "");
        assert!(remove_comments("text <!-- never closed").is_err());
    }

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("## Start from the edges\n\nWrite it <!-- hidden -->down.\n").unwrap();
        assert!(html.starts_with("<h2>Start from the edges</h2>\n<p>Write it down.</p>"));
        assert!(!html.contains("hidden"));
    }

    #[test]
    fn test_render_gfm_table() {
        let html = render_markdown("| a | b |\n| - | - |\n| 1 | 2 |\n").unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }
}
