//! 服务器状态

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::StatsRepository;
use crate::stats::StatsService;
use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Clone 实现浅拷贝 (内部为数据库句柄)，所有权成本极低。
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 方法代替
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self { config, db }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/stats.db)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("stats.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 统计仓库 (读侧聚合查询)
    pub fn stats_repository(&self) -> StatsRepository {
        StatsRepository::new(self.db.clone(), self.config.timezone)
    }

    /// 统计服务门面
    pub fn stats(&self) -> StatsService<StatsRepository> {
        StatsService::new(self.stats_repository())
    }
}
