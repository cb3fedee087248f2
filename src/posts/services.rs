use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Comment, Like, Post};
use crate::{auth::repo_types::User, error::ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LikeError {
    #[error("already liked")]
    AlreadyLiked,
    #[error("not yet liked")]
    NotLiked,
}

/// What a like list belongs to; only changes the wording of rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post,
    Comment,
}

impl LikeTarget {
    pub fn reject(self, err: LikeError) -> ApiError {
        let msg = match (self, err) {
            (LikeTarget::Post, LikeError::AlreadyLiked) => "Post already liked",
            (LikeTarget::Post, LikeError::NotLiked) => "Post has not yet been liked",
            (LikeTarget::Comment, LikeError::AlreadyLiked) => "Comment already liked",
            (LikeTarget::Comment, LikeError::NotLiked) => "Comment has not yet been liked",
        };
        ApiError::BadRequest(msg.into())
    }
}

pub fn has_liked(likes: &[Like], user: Uuid) -> bool {
    likes.iter().any(|l| l.user == user)
}

/// Prepends a like for `user`, refusing a second one.
pub fn like(likes: &mut Vec<Like>, user: Uuid) -> Result<(), LikeError> {
    if has_liked(likes, user) {
        return Err(LikeError::AlreadyLiked);
    }
    likes.insert(0, Like { user });
    Ok(())
}

/// Removes the first like by `user`.
pub fn unlike(likes: &mut Vec<Like>, user: Uuid) -> Result<(), LikeError> {
    let idx = likes
        .iter()
        .position(|l| l.user == user)
        .ok_or(LikeError::NotLiked)?;
    likes.remove(idx);
    Ok(())
}

pub fn ensure_owner(author: Uuid, requester: Uuid) -> Result<(), ApiError> {
    if author != requester {
        return Err(ApiError::not_authorized());
    }
    Ok(())
}

pub fn new_post(author: &User, text: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        user: author.id,
        text: text.trim().to_string(),
        name: author.name.clone(),
        avatar: author.avatar.clone(),
        likes: Vec::new(),
        comments: Vec::new(),
        date: OffsetDateTime::now_utc(),
    }
}

/// Prepends a comment by `author` and returns its id.
pub fn add_comment(post: &mut Post, author: &User, text: &str) -> Uuid {
    let comment = Comment {
        id: Uuid::new_v4(),
        user: author.id,
        text: text.trim().to_string(),
        name: author.name.clone(),
        avatar: author.avatar.clone(),
        likes: Vec::new(),
        date: OffsetDateTime::now_utc(),
    };
    let id = comment.id;
    post.comments.insert(0, comment);
    id
}

pub fn find_comment_mut(post: &mut Post, comment_id: Uuid) -> Result<&mut Comment, ApiError> {
    post.comments
        .iter_mut()
        .find(|c| c.id == comment_id)
        .ok_or_else(|| ApiError::NotFound("Comment does not exist".into()))
}

/// Removes the comment with `comment_id` if `requester` wrote it.
pub fn remove_comment(post: &mut Post, comment_id: Uuid, requester: Uuid) -> Result<Comment, ApiError> {
    let idx = post
        .comments
        .iter()
        .position(|c| c.id == comment_id)
        .ok_or_else(|| ApiError::NotFound("Comment does not exist".into()))?;
    ensure_owner(post.comments[idx].user, requester)?;
    Ok(post.comments.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: String::new(),
            avatar: Some(format!("https://avatars.example/{name}")),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn like_prepends_and_refuses_duplicates() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut likes = Vec::new();
        like(&mut likes, a).unwrap();
        like(&mut likes, b).unwrap();
        assert_eq!(likes, vec![Like { user: b }, Like { user: a }]);

        assert_eq!(like(&mut likes, a), Err(LikeError::AlreadyLiked));
        assert_eq!(likes.len(), 2);
    }

    #[test]
    fn unlike_removes_only_that_user() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut likes = vec![Like { user: b }, Like { user: a }];
        unlike(&mut likes, a).unwrap();
        assert_eq!(likes, vec![Like { user: b }]);
        assert_eq!(unlike(&mut likes, a), Err(LikeError::NotLiked));
        assert_eq!(unlike(&mut Vec::new(), b), Err(LikeError::NotLiked));
    }

    #[test]
    fn rejections_are_worded_per_target() {
        let err = LikeTarget::Comment.reject(LikeError::NotLiked);
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Comment has not yet been liked"));
        assert_eq!(
            LikeTarget::Post.reject(LikeError::AlreadyLiked).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn new_post_copies_author_details() {
        let ada = user("Ada");
        let post = new_post(&ada, "  hello devs ");
        assert_eq!(post.user, ada.id);
        assert_eq!(post.text, "hello devs");
        assert_eq!(post.name, "Ada");
        assert_eq!(post.avatar, ada.avatar);
        assert!(post.likes.is_empty() && post.comments.is_empty());
    }

    #[test]
    fn remove_comment_targets_the_id_not_the_author() {
        let ada = user("Ada");
        let mut post = new_post(&ada, "post");
        let first = add_comment(&mut post, &ada, "first");
        let second = add_comment(&mut post, &ada, "second");
        assert_eq!(post.comments[0].id, second);

        let removed = remove_comment(&mut post, first, ada.id).unwrap();
        assert_eq!(removed.text, "first");
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].id, second);
    }

    #[test]
    fn remove_comment_checks_existence_then_author() {
        let (ada, bob) = (user("Ada"), user("Bob"));
        let mut post = new_post(&ada, "post");
        let id = add_comment(&mut post, &ada, "mine");

        let err = remove_comment(&mut post, Uuid::new_v4(), ada.id).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = remove_comment(&mut post, id, bob.id).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(post.comments.len(), 1);
    }

    #[test]
    fn comment_likes_are_independent_of_post_likes() {
        let ada = user("Ada");
        let mut post = new_post(&ada, "post");
        let id = add_comment(&mut post, &ada, "c");
        like(&mut find_comment_mut(&mut post, id).unwrap().likes, ada.id).unwrap();
        assert!(post.likes.is_empty());
        assert!(has_liked(&post.comments[0].likes, ada.id));
    }
}
