//! Typed translation table.
//!
//! Every user-facing string is a [`TextKey`]. English is the fallback
//! language and must cover every key (the match in [`fallback`] is
//! exhaustive, so a new key without an English string does not compile).
//! Other languages may leave keys untranslated; [`text`] falls back to
//! English for those.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Some(Self::En),
            "zh" | "zh-cn" | "zh-hans" | "zh-tw" | "zh-hant" => Some(Self::Zh),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    // Step labels
    StepBasicInfo,
    StepProfileSummary,
    StepSymptoms,
    StepUploadReports,
    StepUploadMedicine,
    StepSelectDoctor,
    StepInquiry,
    StepInquirySummary,
    StepTongue,
    StepFace,
    StepAudio,
    StepPulse,
    StepSmartConnect,
    StepAnalysis,
    StepResults,

    // Doctor tiers
    DoctorResident,
    DoctorAttending,
    DoctorChief,

    // Navigation and confirmations
    Retry,
    ViewResultsAnyway,
    ConfirmExitTitle,
    ConfirmExitBody,
    ConfirmNewAssessmentTitle,
    ConfirmNewAssessmentBody,

    // Step errors
    PulseConflict,
    AnalysisFailed,
    CaptureBusy,
    CaptureFailed,
    PermissionDenied,
    InvalidTongue,
    InvalidFace,
    InvalidAudio,
    InvalidDocument,
    PersistFailed,
    StepCrashed,

    // Console prompts and labels
    ConsoleHelp,
    AlreadyAtFirstStep,
    FillRequiredFields,
    PressEnterToRetry,
    PressEnterToContinue,
    UnrecognizedEntry,
    LabelName,
    LabelAge,
    LabelGender,
    LabelHeight,
    LabelWeight,
    NotAGenderOption,
    GenderMale,
    GenderFemale,
    GenderOther,
    ProfileLine,
    LabelMainConcern,
    LabelSymptomList,
    LabelDuration,
    PromptReportPath,
    ReadingDocument,
    PromptMedicines,
    PromptChooseDoctor,
    ChooseListedDoctor,
    SpeakerPatient,
    SpeakerDoctor,
    PromptInquiryAnswer,
    NoSummary,
    PromptSummary,
    PromptTonguePath,
    PromptFacePath,
    PromptVoicePath,
    Recorded,
    Analyzing,
    PulseRate,
    PromptPulse,
    MeasureInstructions,
    MeasuredBpm,
    ImportedFrom,
    PromptSmartConnect,
    ImportFailed,
    PreparingAssessment,
    PromptResults,
    PromptResultsRetry,
    PromptFaultRetry,
    PromptFaultBack,
    LabelConstitution,
    LabelSyndrome,
    LabelSummary,
    SavedAsReport,
    NotSavedGuest,
    NotSavedNoStore,

    // Inquiry suggestions
    OptLessThanWeek,
    OptOneToFourWeeks,
    OptOneToSixMonths,
    OptOverSixMonths,
    OptDaily,
    OptFewTimesWeek,
    OptOccasionally,
    OptRarely,
    OptMild,
    OptModerate,
    OptSevere,
    OptSleepWell,
    OptHardToFallAsleep,
    OptWakeOften,
    OptVividDreams,
    OptNormalAppetite,
    OptPoorAppetite,
    OptPreferWarm,
    OptPreferCold,
    OptLowStress,
    OptSomeStress,
    OptHighStress,
    OptYes,
    OptNo,
    OptSometimes,
    OptNotSure,
}

/// Resolve a key for the given language, falling back to English.
pub fn text(lang: Language, key: TextKey) -> &'static str {
    match lang {
        Language::En => fallback(key),
        Language::Zh => zh(key).unwrap_or_else(|| fallback(key)),
    }
}

/// Fill `{name}` placeholders in a translated template.
pub fn format(lang: Language, key: TextKey, args: &[(&str, &str)]) -> String {
    let mut out = text(lang, key).to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

fn fallback(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        StepBasicInfo => "Basic Info",
        StepProfileSummary => "Your Profile",
        StepSymptoms => "Symptoms",
        StepUploadReports => "Medical Reports",
        StepUploadMedicine => "Medications",
        StepSelectDoctor => "Choose Doctor",
        StepInquiry => "Consultation",
        StepInquirySummary => "Consultation Summary",
        StepTongue => "Tongue",
        StepFace => "Face",
        StepAudio => "Voice",
        StepPulse => "Pulse",
        StepSmartConnect => "Smart Devices",
        StepAnalysis => "Analysis",
        StepResults => "Results",

        DoctorResident => "Resident Physician",
        DoctorAttending => "Attending Physician",
        DoctorChief => "Chief Physician",

        Retry => "Retry",
        ViewResultsAnyway => "View results anyway",
        ConfirmExitTitle => "Leave assessment?",
        ConfirmExitBody => "Your answers so far will be lost.",
        ConfirmNewAssessmentTitle => "Start a new assessment?",
        ConfirmNewAssessmentBody => "The current assessment will be cleared.",

        PulseConflict => "{selected} conflicts with {existing}. Deselect {existing} first.",
        AnalysisFailed => "Analysis failed. Please try again.",
        CaptureBusy => "Please wait for the current analysis to finish.",
        CaptureFailed => "Could not capture media. Please try again.",
        PermissionDenied => "Permission denied. Please allow access in system settings.",
        InvalidTongue => "That does not look like a tongue. Please retake the photo.",
        InvalidFace => "No face detected. Please retake the photo in good light.",
        InvalidAudio => "No clear voice detected. Please record again.",
        InvalidDocument => "That does not look like a medical document.",
        PersistFailed => "Your report could not be saved to the cloud.",
        StepCrashed => "Something went wrong on this step.",

        ConsoleHelp => "Commands: :back  :exit  :new  :quit  :help",
        AlreadyAtFirstStep => "Already at the first step.",
        FillRequiredFields => "Please fill in the required fields first.",
        PressEnterToRetry => "Press Enter to retry",
        PressEnterToContinue => "Press Enter to continue",
        UnrecognizedEntry => "Unrecognized entry.",
        LabelName => "Name",
        LabelAge => "Age",
        LabelGender => "Gender (m/f/o)",
        LabelHeight => "Height in cm",
        LabelWeight => "Weight in kg",
        NotAGenderOption => "'{value}' is not a gender option.",
        GenderMale => "male",
        GenderFemale => "female",
        GenderOther => "other",
        ProfileLine => "{name}, {age} years, {gender}\n{height} cm, {weight} kg",
        LabelMainConcern => "Main concern",
        LabelSymptomList => "Symptoms, comma separated",
        LabelDuration => "Duration (d/w/m/y)",
        PromptReportPath => "Path to a report (image or PDF), 'r N' to remove, Enter to continue",
        ReadingDocument => "Reading the document...",
        PromptMedicines => "'t NAME: dosage' to add, 'i PATH' for a photo, 'r N' to remove, Enter to continue",
        PromptChooseDoctor => "Choose a doctor",
        ChooseListedDoctor => "Please choose one of the listed doctors.",
        SpeakerPatient => "You",
        SpeakerDoctor => "Doctor",
        PromptInquiryAnswer => "Your answer (a number picks a suggestion, Enter to finish)",
        NoSummary => "(no summary)",
        PromptSummary => "Press Enter to accept, or type a corrected summary",
        PromptTonguePath => "Path to a tongue photo, 'r' to clear, Enter to continue",
        PromptFacePath => "Path to a face photo, 'r' to clear, Enter to continue",
        PromptVoicePath => "Path to a voice recording, 'r' to clear, Enter to continue",
        Recorded => "Recorded: {observation}",
        Analyzing => "Analyzing...",
        PulseRate => "Rate: {bpm} bpm",
        PromptPulse => "Number toggles a quality, 'b BPM' sets the rate, 't' to measure, Enter to continue",
        MeasureInstructions => "Press Enter on every beat for {seconds} seconds. Type anything to stop.",
        MeasuredBpm => "Measured {bpm} bpm.",
        ImportedFrom => "Imported from {service}",
        PromptSmartConnect => "Path to exported health data (JSON), 'r' to clear, Enter to continue",
        ImportFailed => "Could not import {path}: {error}",
        PreparingAssessment => "Preparing your assessment...",
        PromptResults => ":new for a new assessment, :exit to leave",
        PromptResultsRetry => "'s': {retry}  Enter: {view}  :new  :exit",
        PromptFaultRetry => "'r' to retry, 'b' to go back",
        PromptFaultBack => "'b' to go back",
        LabelConstitution => "Constitution",
        LabelSyndrome => "Syndrome",
        LabelSummary => "Summary",
        SavedAsReport => "Saved as report {id}",
        NotSavedGuest => "Not saved (guest session)",
        NotSavedNoStore => "Not saved (no report storage configured)",

        OptLessThanWeek => "Less than a week",
        OptOneToFourWeeks => "1-4 weeks",
        OptOneToSixMonths => "1-6 months",
        OptOverSixMonths => "Over 6 months",
        OptDaily => "Daily",
        OptFewTimesWeek => "A few times a week",
        OptOccasionally => "Occasionally",
        OptRarely => "Rarely",
        OptMild => "Mild",
        OptModerate => "Moderate",
        OptSevere => "Severe",
        OptSleepWell => "I sleep well",
        OptHardToFallAsleep => "Hard to fall asleep",
        OptWakeOften => "Wake up often",
        OptVividDreams => "Many dreams",
        OptNormalAppetite => "Normal appetite",
        OptPoorAppetite => "Poor appetite",
        OptPreferWarm => "Prefer warm food",
        OptPreferCold => "Prefer cold drinks",
        OptLowStress => "Low stress",
        OptSomeStress => "Some stress",
        OptHighStress => "High stress",
        OptYes => "Yes",
        OptNo => "No",
        OptSometimes => "Sometimes",
        OptNotSure => "Not sure",
    }
}

fn zh(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    let s = match key {
        StepBasicInfo => "基本信息",
        StepProfileSummary => "个人档案",
        StepSymptoms => "症状",
        StepUploadReports => "检查报告",
        StepUploadMedicine => "用药情况",
        StepSelectDoctor => "选择医生",
        StepInquiry => "问诊",
        StepInquirySummary => "问诊总结",
        StepTongue => "舌诊",
        StepFace => "面诊",
        StepAudio => "闻诊",
        StepPulse => "脉诊",
        StepSmartConnect => "智能设备",
        StepAnalysis => "分析",
        StepResults => "结果",

        DoctorResident => "住院医师",
        DoctorAttending => "主治医师",
        DoctorChief => "主任医师",

        Retry => "重试",
        ViewResultsAnyway => "仍然查看结果",
        ConfirmExitTitle => "退出评估？",
        ConfirmExitBody => "已填写的内容将会丢失。",
        ConfirmNewAssessmentTitle => "开始新的评估？",
        ConfirmNewAssessmentBody => "当前评估内容将被清空。",

        PulseConflict => "{selected}与{existing}相互矛盾，请先取消{existing}。",
        AnalysisFailed => "分析失败，请重试。",
        CaptureBusy => "请等待当前分析完成。",
        CaptureFailed => "无法获取媒体，请重试。",
        PermissionDenied => "权限被拒绝，请在系统设置中允许访问。",
        InvalidTongue => "未识别到舌头，请重新拍摄。",
        InvalidFace => "未检测到人脸，请在光线充足处重新拍摄。",
        InvalidAudio => "未检测到清晰的声音，请重新录制。",
        InvalidDocument => "这似乎不是医疗文件。",
        PersistFailed => "报告未能保存到云端。",
        StepCrashed => "此步骤出现问题。",

        ConsoleHelp => "命令：:back 上一步  :exit 退出  :new 新评估  :quit 结束  :help 帮助",
        AlreadyAtFirstStep => "已经是第一步。",
        FillRequiredFields => "请先填写必填项。",
        PressEnterToRetry => "按回车键重试",
        PressEnterToContinue => "按回车键继续",
        UnrecognizedEntry => "无法识别的输入。",
        LabelName => "姓名",
        LabelAge => "年龄",
        LabelGender => "性别 (m/f/o)",
        LabelHeight => "身高（厘米）",
        LabelWeight => "体重（公斤）",
        NotAGenderOption => "“{value}”不是有效的性别选项。",
        GenderMale => "男",
        GenderFemale => "女",
        GenderOther => "其他",
        ProfileLine => "{name}，{age}岁，{gender}\n{height} 厘米，{weight} 公斤",
        LabelMainConcern => "主诉",
        LabelSymptomList => "症状（用逗号分隔）",
        LabelDuration => "持续时间 (d/w/m/y)",
        PromptReportPath => "报告路径（图片或 PDF），输入“r 序号”删除，回车继续",
        ReadingDocument => "正在读取文件……",
        PromptMedicines => "输入“t 药名: 用量”添加，“i 路径”添加照片，“r 序号”删除，回车继续",
        PromptChooseDoctor => "请选择医生",
        ChooseListedDoctor => "请选择列表中的医生。",
        SpeakerPatient => "你",
        SpeakerDoctor => "医生",
        PromptInquiryAnswer => "你的回答（输入序号选择建议，回车结束）",
        NoSummary => "（暂无总结）",
        PromptSummary => "回车确认，或输入修改后的总结",
        PromptTonguePath => "舌头照片路径，输入“r”清除，回车继续",
        PromptFacePath => "面部照片路径，输入“r”清除，回车继续",
        PromptVoicePath => "录音文件路径，输入“r”清除，回车继续",
        Recorded => "已记录：{observation}",
        Analyzing => "正在分析……",
        PulseRate => "脉率：{bpm} 次/分",
        PromptPulse => "输入序号切换脉象，“b 数值”设置脉率，“t”开始测量，回车继续",
        MeasureInstructions => "请在每次脉搏跳动时按回车，持续 {seconds} 秒。输入任意内容停止。",
        MeasuredBpm => "测得 {bpm} 次/分。",
        ImportedFrom => "已从 {service} 导入",
        PromptSmartConnect => "健康数据导出文件路径（JSON），输入“r”清除，回车继续",
        ImportFailed => "无法导入 {path}：{error}",
        PreparingAssessment => "正在生成评估……",
        PromptResults => ":new 开始新评估，:exit 退出",
        PromptResultsRetry => "“s”：{retry}  回车：{view}  :new  :exit",
        PromptFaultRetry => "输入“r”重试，“b”返回上一步",
        PromptFaultBack => "输入“b”返回上一步",
        LabelConstitution => "体质",
        LabelSyndrome => "证型",
        LabelSummary => "总结",
        SavedAsReport => "已保存为报告 {id}",
        NotSavedGuest => "未保存（访客模式）",
        NotSavedNoStore => "未保存（未配置报告存储）",

        OptLessThanWeek => "不到一周",
        OptOneToFourWeeks => "一到四周",
        OptOneToSixMonths => "一到六个月",
        OptOverSixMonths => "六个月以上",
        OptDaily => "每天",
        OptFewTimesWeek => "每周几次",
        OptOccasionally => "偶尔",
        OptRarely => "很少",
        OptMild => "轻微",
        OptModerate => "中等",
        OptSevere => "严重",
        OptSleepWell => "睡眠良好",
        OptHardToFallAsleep => "入睡困难",
        OptWakeOften => "容易醒",
        OptVividDreams => "多梦",
        OptNormalAppetite => "食欲正常",
        OptPoorAppetite => "食欲不振",
        OptPreferWarm => "喜温热食物",
        OptPreferCold => "喜冷饮",
        OptLowStress => "压力小",
        OptSomeStress => "有些压力",
        OptHighStress => "压力很大",
        OptYes => "是",
        OptNo => "否",
        OptSometimes => "有时",
        OptNotSure => "不确定",
    };
    Some(s)
}
