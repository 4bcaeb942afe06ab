use route_attributes::attributes::{
    domain, get, prefix, put, where_alpha, where_in, where_number, where_pattern, where_uuid,
};

#[prefix("posts")]
#[where_number("post")]
#[where_uuid("author", "editor")]
pub struct AnnotatedPostController;

impl AnnotatedPostController {
    #[get("{post}")]
    pub fn show(&self) -> &'static str {
        "show"
    }

    #[put("{post}/comments/{comment}")]
    #[where_number("post", "comment")]
    pub fn update_comment(&self) -> &'static str {
        "update_comment"
    }

    #[get("{post}/export/{format}")]
    #[where_in("format", ["json", "xml"])]
    #[where_pattern("post", "[0-9]{1,3}")]
    pub fn export(&self) -> &'static str {
        "export"
    }

    #[get("{post}/tags/{tag}")]
    #[where_alpha("tag")]
    #[domain("blog.example.com")]
    pub fn tag(&self) -> &'static str {
        "tag"
    }
}
