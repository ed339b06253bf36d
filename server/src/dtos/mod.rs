//! DTOs module - Data Transfer Objects
//!
//! DTOs keep the API representation apart from the entities stored in the database.

pub mod admin;
pub mod advertisement;
pub mod conversation;
pub mod image;
pub mod message;
pub mod query;
pub mod user;

pub use admin::{AdminLogDTO, BanDTO, ChangeRoleDTO, CreateAdminLogDTO};
pub use advertisement::{
    AdvertisementDTO, AdvertisementFilter, CreateAdvertisementDTO, NewAdvertisementDTO,
    UpdateAdvertisementDTO,
};
pub use conversation::{ConversationDTO, UnreadTotalDTO};
pub use image::ImageDTO;
pub use message::{CreateMessageDTO, MarkReadDTO, MessageDTO, SendMessageDTO};
pub use query::{MessagesQuery, PageQuery, UserSearchQuery};
pub use user::{CreateUserDTO, LoginDTO, UpdateUserDTO, UserDTO};
