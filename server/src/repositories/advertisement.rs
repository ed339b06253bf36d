//! AdvertisementRepository - Listings, filters and the VIP flag

use super::user::escape_like;
use super::{Create, Delete, Read, Update};
use crate::dtos::{AdvertisementFilter, NewAdvertisementDTO, UpdateAdvertisementDTO};
use crate::dtos::advertisement::normalize_handle;
use crate::dtos::query::clamp_page;
use crate::entities::Advertisement;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

pub struct AdvertisementRepository {
    connection_pool: SqlitePool,
}

impl AdvertisementRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Public listing: VIP first, then newest
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &AdvertisementFilter) -> Result<Vec<Advertisement>, Error> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM advertisements WHERE 1 = 1");

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(subcategory) = &filter.subcategory {
            query.push(" AND subcategory = ").push_bind(subcategory.clone());
        }
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if filter.vip_only.unwrap_or(false) {
            query.push(" AND is_vip = 1");
        }
        if let Some(min_price) = filter.min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            query
                .push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        let (limit, offset) = clamp_page(filter.limit, filter.offset);
        query
            .push(" ORDER BY is_vip DESC, created_at DESC, advertisement_id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let advertisements = query
            .build_query_as::<Advertisement>()
            .fetch_all(&self.connection_pool)
            .await?;
        debug!("Listed {} advertisements", advertisements.len());
        Ok(advertisements)
    }

    #[instrument(skip(self))]
    pub async fn set_vip(&self, advertisement_id: i32, is_vip: bool) -> Result<Advertisement, Error> {
        sqlx::query_as::<_, Advertisement>(
            "UPDATE advertisements SET is_vip = ?, updated_at = ? \
             WHERE advertisement_id = ? RETURNING *",
        )
        .bind(is_vip)
        .bind(Utc::now())
        .bind(advertisement_id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)
    }
}

impl Create<Advertisement, NewAdvertisementDTO> for AdvertisementRepository {
    #[instrument(skip(self, data), fields(user_id = %data.user_id))]
    async fn create(&self, data: &NewAdvertisementDTO) -> Result<Advertisement, Error> {
        let advertisement = sqlx::query_as::<_, Advertisement>(
            r#"
            INSERT INTO advertisements
                (user_id, category, subcategory, title, description, images,
                 telegram, discord, price, is_vip, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(&data.category)
        .bind(&data.subcategory)
        .bind(&data.title)
        .bind(&data.description)
        .bind(Json(&data.images))
        .bind(&data.telegram)
        .bind(&data.discord)
        .bind(data.price)
        .bind(data.created_at)
        .bind(data.created_at)
        .fetch_one(&self.connection_pool)
        .await?;

        info!("Advertisement created with id {}", advertisement.advertisement_id);
        Ok(advertisement)
    }
}

impl Read<Advertisement, i32> for AdvertisementRepository {
    async fn read(&self, id: &i32) -> Result<Option<Advertisement>, Error> {
        sqlx::query_as::<_, Advertisement>("SELECT * FROM advertisements WHERE advertisement_id = ?")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Advertisement, UpdateAdvertisementDTO, i32> for AdvertisementRepository {
    /// An empty contact string clears that contact; the table's CHECK rejects
    /// an update leaving no contact at all.
    #[instrument(skip(self, data), fields(advertisement_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateAdvertisementDTO) -> Result<Advertisement, Error> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE advertisements SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(category) = &data.category {
            query.push(", category = ").push_bind(category.clone());
        }
        if let Some(subcategory) = &data.subcategory {
            query.push(", subcategory = ").push_bind(subcategory.clone());
        }
        if let Some(title) = &data.title {
            query.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &data.description {
            query.push(", description = ").push_bind(description.clone());
        }
        if let Some(images) = &data.images {
            query.push(", images = ").push_bind(Json(images.clone()));
        }
        if let Some(telegram) = &data.telegram {
            query.push(", telegram = ").push_bind(normalize_handle(Some(telegram.clone())));
        }
        if let Some(discord) = &data.discord {
            query.push(", discord = ").push_bind(normalize_handle(Some(discord.clone())));
        }
        // Some(None) stores NULL
        if let Some(price) = data.price {
            query.push(", price = ").push_bind(price);
        }

        query
            .push(" WHERE advertisement_id = ")
            .push_bind(*id)
            .push(" RETURNING *");

        query
            .build_query_as::<Advertisement>()
            .fetch_optional(&self.connection_pool)
            .await?
            .ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for AdvertisementRepository {
    /// Conversations scoped to the listing go with it (ON DELETE CASCADE)
    #[instrument(skip(self))]
    async fn delete(&self, id: &i32) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM advertisements WHERE advertisement_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }
}
