use mdminecraft_inventory::{InventoryOp, SlotRef};
use mdminecraft_testkit::{JsonlSink, OpRecord};

#[test]
fn operation_journal_can_be_written() {
    let mut sink = JsonlSink::create(std::env::temp_dir().join("craft-oplog.jsonl"))
        .expect("can create temp log");
    let op = InventoryOp::Click {
        slot: SlotRef(0),
        right: false,
    };
    let record = OpRecord {
        step: 0,
        kind: op.kind(),
        payload: &op,
    };
    sink.write(&record).expect("can write op");
}
