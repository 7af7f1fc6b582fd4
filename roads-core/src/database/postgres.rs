use super::traits::RoadsRepository;
use crate::{CoreError, Result};
use async_trait::async_trait;
use roads_model::{
    Contractor, ContractorID, Milestone, MilestoneID, Notification,
    NotificationID, Photo, PhotoID, Road, RoadID, RoadStatus, SnapshotID,
    StatsSnapshot, User, UserID,
};
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Schema bootstrap DDL, executed in order. Join tables cascade with their
/// road so deleting a road never strands association rows.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS roads (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        length DOUBLE PRECISION NOT NULL,
        budget BIGINT NOT NULL,
        status TEXT NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        progress INTEGER NOT NULL DEFAULT 0,
        description TEXT NOT NULL,
        map_path JSONB,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contractors (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        contact_email TEXT NOT NULL,
        contact_phone TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS milestones (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'pending'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS road_contractors (
        road_id UUID NOT NULL REFERENCES roads(id) ON DELETE CASCADE,
        contractor_id UUID NOT NULL
            REFERENCES contractors(id) ON DELETE CASCADE,
        PRIMARY KEY (road_id, contractor_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS road_milestones (
        road_id UUID NOT NULL REFERENCES roads(id) ON DELETE CASCADE,
        milestone_id UUID NOT NULL
            REFERENCES milestones(id) ON DELETE CASCADE,
        PRIMARY KEY (road_id, milestone_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS photos (
        id UUID PRIMARY KEY,
        url TEXT NOT NULL,
        caption TEXT,
        date_taken TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        road_id UUID NOT NULL REFERENCES roads(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        avatar_url TEXT,
        last_login TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        message TEXT NOT NULL,
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS road_stats (
        id UUID PRIMARY KEY,
        total_roads BIGINT NOT NULL,
        completed_roads BIGINT NOT NULL,
        in_progress_roads BIGINT NOT NULL,
        planned_roads BIGINT NOT NULL,
        budget_allocated BIGINT NOT NULL,
        budget_spent DOUBLE PRECISION NOT NULL,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub async fn new(connection_string: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL database");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(connection_string)
            .await?;

        info!("Successfully connected to PostgreSQL");

        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn road_from_row(
        row: &PgRow,
        contractors: Vec<ContractorID>,
        milestones: Vec<MilestoneID>,
    ) -> Result<Road> {
        let map_path = match row.try_get::<Option<serde_json::Value>, _>(
            "map_path",
        )? {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };

        Ok(Road {
            id: RoadID(row.try_get("id")?),
            name: row.try_get("name")?,
            length: row.try_get("length")?,
            budget: row.try_get("budget")?,
            status: RoadStatus::parse(&row.try_get::<String, _>("status")?),
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            progress: row.try_get("progress")?,
            description: row.try_get("description")?,
            map_path,
            contractors,
            milestones,
        })
    }

    fn contractor_from_row(row: &PgRow) -> Result<Contractor> {
        Ok(Contractor {
            id: ContractorID(row.try_get("id")?),
            name: row.try_get("name")?,
            contact_email: row.try_get("contact_email")?,
            contact_phone: row.try_get("contact_phone")?,
        })
    }

    fn user_from_row(row: &PgRow) -> Result<User> {
        Ok(User {
            id: UserID(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: row.try_get("role")?,
            avatar_url: row.try_get("avatar_url")?,
            last_login: row.try_get("last_login")?,
        })
    }

    fn snapshot_from_row(row: &PgRow) -> Result<StatsSnapshot> {
        Ok(StatsSnapshot {
            id: SnapshotID(row.try_get("id")?),
            total_roads: row.try_get("total_roads")?,
            completed_roads: row.try_get("completed_roads")?,
            in_progress_roads: row.try_get("in_progress_roads")?,
            planned_roads: row.try_get("planned_roads")?,
            budget_allocated: row.try_get("budget_allocated")?,
            budget_spent: row.try_get("budget_spent")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }

    /// Load all association rows grouped by road for one join table.
    async fn associations(
        &self,
        query: &str,
        column: &str,
    ) -> Result<HashMap<Uuid, Vec<Uuid>>> {
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in rows {
            let road_id: Uuid = row.try_get("road_id")?;
            grouped
                .entry(road_id)
                .or_default()
                .push(row.try_get(column)?);
        }
        Ok(grouped)
    }

    /// Insert a milestone row outside any road association. Seeding needs
    /// this; the HTTP surface only reads milestones through roads, so the
    /// repository trait does not carry it.
    pub async fn store_milestone(&self, milestone: &Milestone) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO milestones (id, name, description, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(milestone.id.to_uuid())
        .bind(&milestone.name)
        .bind(&milestone.description)
        .bind(&milestone.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace_associations(&self, road: &Road) -> Result<()> {
        sqlx::query("DELETE FROM road_contractors WHERE road_id = $1")
            .bind(road.id.to_uuid())
            .execute(&self.pool)
            .await?;
        for contractor in &road.contractors {
            sqlx::query(
                "INSERT INTO road_contractors (road_id, contractor_id)
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(road.id.to_uuid())
            .bind(contractor.to_uuid())
            .execute(&self.pool)
            .await?;
        }

        sqlx::query("DELETE FROM road_milestones WHERE road_id = $1")
            .bind(road.id.to_uuid())
            .execute(&self.pool)
            .await?;
        for milestone in &road.milestones {
            sqlx::query(
                "INSERT INTO road_milestones (road_id, milestone_id)
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(road.id.to_uuid())
            .bind(milestone.to_uuid())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl RoadsRepository for PostgresRepository {
    async fn initialize_schema(&self) -> Result<()> {
        info!("Running database schema bootstrap");

        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Database schema ready");
        Ok(())
    }

    async fn list_roads(&self) -> Result<Vec<Road>> {
        debug!("Listing all roads");

        let rows = sqlx::query(
            r#"
            SELECT id, name, length, budget, status, start_date, end_date,
                   progress, description, map_path
            FROM roads
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut contractors = self
            .associations(
                "SELECT road_id, contractor_id FROM road_contractors",
                "contractor_id",
            )
            .await?;
        let mut milestones = self
            .associations(
                "SELECT road_id, milestone_id FROM road_milestones",
                "milestone_id",
            )
            .await?;

        let mut roads = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: Uuid = row.try_get("id")?;
            let road_contractors = contractors
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(ContractorID)
                .collect();
            let road_milestones = milestones
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(MilestoneID)
                .collect();
            roads.push(Self::road_from_row(
                row,
                road_contractors,
                road_milestones,
            )?);
        }

        Ok(roads)
    }

    async fn get_road(&self, id: &RoadID) -> Result<Option<Road>> {
        debug!("Retrieving road {id}");

        let row = sqlx::query(
            r#"
            SELECT id, name, length, budget, status, start_date, end_date,
                   progress, description, map_path
            FROM roads
            WHERE id = $1
            "#,
        )
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let contractors = sqlx::query(
            "SELECT contractor_id FROM road_contractors WHERE road_id = $1",
        )
        .bind(id.to_uuid())
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.try_get("contractor_id").map(ContractorID))
        .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;

        let milestones = sqlx::query(
            "SELECT milestone_id FROM road_milestones WHERE road_id = $1",
        )
        .bind(id.to_uuid())
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.try_get("milestone_id").map(MilestoneID))
        .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;

        Self::road_from_row(&row, contractors, milestones).map(Some)
    }

    async fn store_road(&self, road: &Road) -> Result<()> {
        debug!("Storing road {}", road.name);

        road.validate()?;

        sqlx::query(
            r#"
            INSERT INTO roads (id, name, length, budget, status, start_date,
                               end_date, progress, description, map_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                length = EXCLUDED.length,
                budget = EXCLUDED.budget,
                status = EXCLUDED.status,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                progress = EXCLUDED.progress,
                description = EXCLUDED.description,
                map_path = EXCLUDED.map_path
            "#,
        )
        .bind(road.id.to_uuid())
        .bind(&road.name)
        .bind(road.length)
        .bind(road.budget)
        .bind(road.status.as_str())
        .bind(road.start_date)
        .bind(road.end_date)
        .bind(road.progress)
        .bind(&road.description)
        .bind(serde_json::to_value(&road.map_path)?)
        .execute(&self.pool)
        .await?;

        self.replace_associations(road).await
    }

    async fn update_progress(
        &self,
        id: &RoadID,
        progress: i32,
    ) -> Result<Option<Road>> {
        debug!("Updating progress of road {id} to {progress}");

        let result =
            sqlx::query("UPDATE roads SET progress = $2 WHERE id = $1")
                .bind(id.to_uuid())
                .bind(progress)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_road(id).await
    }

    async fn road_milestones(&self, id: &RoadID) -> Result<Vec<Milestone>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.name, m.description, m.status
            FROM milestones m
            JOIN road_milestones rm ON m.id = rm.milestone_id
            WHERE rm.road_id = $1
            ORDER BY m.name
            "#,
        )
        .bind(id.to_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Milestone {
                    id: MilestoneID(row.try_get("id")?),
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    status: row.try_get("status")?,
                })
            })
            .collect()
    }

    async fn list_contractors(&self) -> Result<Vec<Contractor>> {
        let rows = sqlx::query(
            "SELECT id, name, contact_email, contact_phone
             FROM contractors ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::contractor_from_row).collect()
    }

    async fn get_contractor(
        &self,
        id: &ContractorID,
    ) -> Result<Option<Contractor>> {
        let row = sqlx::query(
            "SELECT id, name, contact_email, contact_phone
             FROM contractors WHERE id = $1",
        )
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::contractor_from_row).transpose()
    }

    async fn contractor_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Contractor>> {
        let row = sqlx::query(
            "SELECT id, name, contact_email, contact_phone
             FROM contractors WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::contractor_from_row).transpose()
    }

    async fn store_contractor(&self, contractor: &Contractor) -> Result<()> {
        debug!("Storing contractor {}", contractor.name);

        sqlx::query(
            r#"
            INSERT INTO contractors (id, name, contact_email, contact_phone)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(contractor.id.to_uuid())
        .bind(&contractor.name)
        .bind(&contractor.contact_email)
        .bind(&contractor.contact_phone)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn store_photo(&self, photo: &Photo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO photos (id, url, caption, date_taken, road_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(photo.id.to_uuid())
        .bind(&photo.url)
        .bind(&photo.caption)
        .bind(photo.date_taken)
        .bind(photo.road_id.to_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_photos(
        &self,
        road_id: Option<&RoadID>,
    ) -> Result<Vec<Photo>> {
        let rows = match road_id {
            Some(id) => {
                sqlx::query(
                    "SELECT id, url, caption, date_taken, road_id
                     FROM photos WHERE road_id = $1
                     ORDER BY date_taken DESC",
                )
                .bind(id.to_uuid())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, url, caption, date_taken, road_id
                     FROM photos ORDER BY date_taken DESC LIMIT 6",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter()
            .map(|row| {
                Ok(Photo {
                    id: PhotoID(row.try_get("id")?),
                    url: row.try_get("url")?,
                    caption: row.try_get("caption")?,
                    date_taken: row.try_get("date_taken")?,
                    road_id: RoadID(row.try_get("road_id")?),
                })
            })
            .collect()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, name, email, role, avatar_url, last_login
             FROM users ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::user_from_row).collect()
    }

    async fn get_user(&self, id: &UserID) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, role, avatar_url, last_login
             FROM users WHERE id = $1",
        )
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, role, avatar_url, last_login
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, avatar_url, last_login)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.to_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.avatar_url)
        .bind(user.last_login)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4, avatar_url = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id.to_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.avatar_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("user {}", user.id)));
        }
        Ok(())
    }

    async fn delete_user(&self, id: &UserID) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    async fn store_notification(
        &self,
        notification: &Notification,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, message, is_read,
                                       created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.id.to_uuid())
        .bind(notification.user_id.to_uuid())
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unread_notifications(
        &self,
        user_id: &UserID,
    ) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, user_id, message, is_read, created_at
             FROM notifications
             WHERE user_id = $1 AND is_read = FALSE
             ORDER BY created_at DESC",
        )
        .bind(user_id.to_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Notification {
                    id: NotificationID(row.try_get("id")?),
                    user_id: UserID(row.try_get("user_id")?),
                    message: row.try_get("message")?,
                    is_read: row.try_get("is_read")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    async fn insert_snapshot(&self, snapshot: &StatsSnapshot) -> Result<()> {
        debug!("Appending stats snapshot {}", snapshot.id);

        // Append-only by construction: snapshots are never updated in place.
        sqlx::query(
            r#"
            INSERT INTO road_stats (id, total_roads, completed_roads,
                                    in_progress_roads, planned_roads,
                                    budget_allocated, budget_spent,
                                    recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(snapshot.id.to_uuid())
        .bind(snapshot.total_roads)
        .bind(snapshot.completed_roads)
        .bind(snapshot.in_progress_roads)
        .bind(snapshot.planned_roads)
        .bind(snapshot.budget_allocated)
        .bind(snapshot.budget_spent)
        .bind(snapshot.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_snapshot(&self) -> Result<Option<StatsSnapshot>> {
        let row = sqlx::query(
            "SELECT id, total_roads, completed_roads, in_progress_roads,
                    planned_roads, budget_allocated, budget_spent, recorded_at
             FROM road_stats ORDER BY recorded_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::snapshot_from_row).transpose()
    }

    async fn snapshot_history(
        &self,
        limit: i64,
    ) -> Result<Vec<StatsSnapshot>> {
        let rows = sqlx::query(
            "SELECT id, total_roads, completed_roads, in_progress_roads,
                    planned_roads, budget_allocated, budget_spent, recorded_at
             FROM road_stats ORDER BY recorded_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::snapshot_from_row).collect()
    }
}
