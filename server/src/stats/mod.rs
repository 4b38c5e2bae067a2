//! 플레이어 통계 집계 / 랭킹
//!
//! - `store`: 통계 파일, usercache, 랭킹 설정 로드
//! - `categories`: 기본 랭킹 필드와 통계 카테고리 매핑
//! - `extract`: 기본 필드 / 커스텀 랭킹 값 계산
//! - `rank`: 필드별 상위 10명 랭킹
//! - `player`: 이름/UUID로 플레이어 조회

pub mod categories;
pub mod extract;
pub mod player;
pub mod rank;
pub mod store;

pub use player::PlayerResolver;
pub use rank::Ranker;
pub use store::StatStore;
