pub mod favorite;
pub mod interaction;
pub mod movie;

pub use favorite::{DisplayFields, Favorite, ItemType, NewFavorite, UserIdRef};
pub use interaction::{
    Interaction, InteractionItemType, InteractionKey, InteractionType, NewInteraction,
};
pub use movie::{FavoriteEntry, FavoritesPayload, ItemRef, ItemSummary, Movie};
