//! 复合事件标识
//!
//! 32 位值：高 16 位为分组（有符号），低 16 位为组内编号（有符号）。
//! 组内编号按完整的低 16 位提取，编号大于 255 时不会被截断。
//!

/// 无效事件标识（0xffffffff）
pub const INVALID_EVENT_ID: i32 = -1;

/// 系统事件所在分组
pub const SYSTEM_GROUP: i16 = 0;

pub const PAINT: i32 = make_id(SYSTEM_GROUP, 0);
pub const SIZE: i32 = make_id(SYSTEM_GROUP, 1);
pub const RESIZE_PAINT: i32 = make_id(SYSTEM_GROUP, 2);
pub const QUIT: i32 = make_id(SYSTEM_GROUP, 3);

/// 系统事件的派发优先级
pub const RESIZE_STAGE_PRIORITY: i32 = 10;
pub const RESIZE_SET_PRIORITY: i32 = 9;
pub const RESIZEPAINT_STAGE_PRIORITY: i32 = -1;

pub const fn make_id(group: i16, id: i16) -> i32 {
    ((group as i32) << 16) | (id as u16 as i32)
}

pub const fn group_id(cid: i32) -> i16 {
    (cid >> 16) as i16
}

pub const fn local_id(cid: i32) -> i16 {
    cid as u16 as i16
}
