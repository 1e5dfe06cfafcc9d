use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use vmdash_common::{NewVm, Vm, VmUpdate};

use super::{DatastoreInfo, RepoError, VmRepository};

const VM_COLUMNS: &str =
    "id, name, region, status, cpu, memory, storage, ip_address, created_at, updated_at";

/// `vms` table access over a shared Postgres pool.
#[derive(Clone)]
pub struct PgVmRepository {
    db: Pool<Postgres>,
}

impl PgVmRepository {
    pub fn new(db: Pool<Postgres>) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.db
    }
}

#[async_trait]
impl VmRepository for PgVmRepository {
    async fn list(&self) -> Result<Vec<Vm>, RepoError> {
        let sql = format!("SELECT {VM_COLUMNS} FROM vms ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<Postgres, Vm>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn create(&self, vm: NewVm) -> Result<Vm, RepoError> {
        let id = uuid::Uuid::new_v4().to_string();
        let sql = format!(
            r#"INSERT INTO vms (id, name, region, status, cpu, memory, storage, ip_address, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
               RETURNING {VM_COLUMNS}"#
        );
        let row = sqlx::query_as::<Postgres, Vm>(&sql)
            .bind(id)
            .bind(vm.name)
            .bind(vm.region)
            .bind(vm.status)
            .bind(vm.cpu)
            .bind(vm.memory)
            .bind(vm.storage)
            .bind(vm.ip_address)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: &str, update: VmUpdate) -> Result<Option<Vm>, RepoError> {
        let sql = format!(
            r#"UPDATE vms
               SET status = $2,
                   cpu = COALESCE($3, cpu),
                   memory = COALESCE($4, memory),
                   storage = COALESCE($5, storage),
                   updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
               WHERE id = $1
               RETURNING {VM_COLUMNS}"#
        );
        let row = sqlx::query_as::<Postgres, Vm>(&sql)
            .bind(id)
            .bind(update.status)
            .bind(update.cpu)
            .bind(update.memory)
            .bind(update.storage)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM vms WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn info(&self) -> Result<DatastoreInfo, RepoError> {
        let (current_time, version): (DateTime<Utc>, String) =
            sqlx::query_as("SELECT NOW(), version()")
                .fetch_one(&self.db)
                .await?;

        let vms_table_exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (
                 SELECT 1 FROM information_schema.tables
                 WHERE table_schema = 'public' AND table_name = 'vms'
               )"#,
        )
        .fetch_one(&self.db)
        .await?;

        let vm_count: i64 = if vms_table_exists {
            sqlx::query_scalar("SELECT COUNT(*) FROM vms")
                .fetch_one(&self.db)
                .await?
        } else {
            0
        };

        Ok(DatastoreInfo {
            current_time,
            version,
            vms_table_exists,
            vm_count,
        })
    }
}
