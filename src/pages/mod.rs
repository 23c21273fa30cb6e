pub mod agent_detail;
pub mod agents;
pub mod contestations;
pub mod criteria;
pub mod dashboard;
pub mod feedback;
pub mod users;
pub mod wallets;
