pub mod stage1_collect;
pub mod stage2_reconcile;
pub mod stage3_aggregate;
