use derive_more::{Display, From};

macro_rules! id {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(pub i64);
        )+
    };
}

id!(
    /// Primary key of a [`Category`](super::Category).
    CategoryId,
    /// Primary key of a [`Subcategory`](super::Subcategory).
    SubcategoryId,
    /// Primary key of an [`Author`](super::Author).
    AuthorId,
    /// Primary key of a [`Reader`](super::Reader).
    ReaderId,
    /// Primary key of a [`Cycle`](super::Cycle).
    CycleId,
    /// Primary key of a [`Book`](super::Book).
    BookId,
    /// Primary key of an attachment, unique within its [`AttachmentKind`](super::AttachmentKind).
    AttachmentId,
    /// Primary key of a [`SocialMediaPlatform`](super::SocialMediaPlatform).
    PlatformId,
    /// Primary key of a [`SocialMediaLink`](super::SocialMediaLink).
    LinkId,
    /// Primary key of a [`BookRating`](super::BookRating).
    RatingId,
    /// Identifier of a user account; accounts live outside the catalog.
    UserId,
);
