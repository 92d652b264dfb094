//! Optional AI narration of the current reading.
//!
//! The narrator is an outside collaborator: it never touches simulation
//! state, and its failures never reach the renderer.  [`narrate`] is the
//! only call site the rest of the crate uses.

use log::warn;

use crate::app::ports::NarrationPort;
use crate::config::Thresholds;
use crate::error::NarrationError;
use crate::sensors::SensorReading;

/// Shown whenever the narrator fails for any reason.
pub const NARRATION_FALLBACK: &str = "暂时无法获取AI分析，请检查网络连接。";

/// Ask `port` for an advisory, degrading to [`NARRATION_FALLBACK`].
///
/// No retries: one failed call yields the fallback immediately.
pub fn narrate(port: &mut impl NarrationPort, reading: &SensorReading) -> String {
    match port.advise(reading) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Narration returned empty text, using fallback");
            NARRATION_FALLBACK.to_owned()
        }
        Err(e) => {
            warn!("Narration failed: {e}");
            NARRATION_FALLBACK.to_owned()
        }
    }
}

/// Prompt sent to a remote language model for `reading`.
pub fn prompt_for(reading: &SensorReading) -> String {
    format!(
        "作为一名初中信息技术老师，请分析以下物联花盆的传感器数据：\n\
         温度: {}°C, 土壤湿度: {}%, 光照强度: {}Lux。\n\
         请简洁地说明当前植物的状态，以及物联网系统应该如何自动处理（比如是否需要浇水、开灯等）。\n\
         字数控制在150字以内，语言要通俗易懂。",
        reading.temperature, reading.humidity, reading.light
    )
}

/// Offline advisor that explains the reading against the control thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNarrator {
    thresholds: Thresholds,
}

impl RuleBasedNarrator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

impl NarrationPort for RuleBasedNarrator {
    fn advise(&mut self, r: &SensorReading) -> Result<String, NarrationError> {
        let t = &self.thresholds;
        let mut advice = Vec::new();

        if r.humidity < t.pump_on_humidity_below {
            advice.push("土壤偏干，系统会启动水泵浇水");
        } else if r.humidity >= t.pump_off_humidity_at {
            advice.push("土壤水分充足，无需浇水");
        }
        if r.light < t.light_on_lux_below {
            advice.push("光照不足，系统会打开补光灯");
        } else if r.light > t.light_off_lux_above {
            advice.push("光照充足，补光灯可以关闭");
        }
        if r.temperature > t.fan_on_temp_above {
            advice.push("温度偏高，系统会开启风扇降温");
        } else if r.temperature <= t.fan_off_temp_at {
            advice.push("温度适宜，风扇无需运行");
        }

        if advice.is_empty() {
            return Ok(String::from("各项数据都在缓冲区间内，执行器保持当前状态。"));
        }
        Ok(format!("{}。", advice.join("；")))
    }
}
