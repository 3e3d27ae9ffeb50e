use crate::cli::StructureMode;
use crate::form::LessonRequest;

/// Student digital competence framework, CV 3456/BGDĐT-GDPT.
fn competency_framework() -> &'static str {
r#"KHUNG NĂNG LỰC SỐ CHO HỌC SINH PHỔ THÔNG (Theo CV 3456/BGDĐT-GDPT):

1. KHAI THÁC DỮ LIỆU VÀ THÔNG TIN
- 1.1.NC1a: Đáp ứng nhu cầu thông tin.
- 1.1.NC1b: Áp dụng kỹ thuật tìm kiếm để lấy dữ liệu.
- 1.2.NC1a: Đánh giá độ tin cậy của nguồn dữ liệu.
- 1.3.NC1b: Tổ chức, sắp xếp dữ liệu (Ví dụ: Dùng Excel, bảng tính).

2. GIAO TIẾP VÀ HỢP TÁC
- 2.1.NC1a: Sử dụng công nghệ để tương tác.
- 2.2.NC1a: Chia sẻ dữ liệu qua công cụ số.
- 2.5.NC1a: Áp dụng chuẩn mực hành vi/quy tắc ứng xử trên mạng.

3. SÁNG TẠO NỘI DUNG SỐ
- 3.1.NC1a: Tạo và chỉnh sửa nội dung ở định dạng khác nhau (Văn bản, hình ảnh, video).
- 3.1.NC1b: Thể hiện bản thân qua nội dung số.
- 3.4.NC1a: Lập trình/Tự thao tác hướng dẫn máy tính (Ví dụ: Scratch, Python cơ bản).

4. AN TOÀN
- 4.1.NC1a: Bảo vệ thiết bị và nội dung số.
- 4.2.NC1a: Bảo vệ dữ liệu cá nhân và quyền riêng tư.
- 4.3.NC1a: Tránh rủi ro sức khỏe khi dùng công nghệ.

5. GIẢI QUYẾT VẤN ĐỀ
- 5.1.NC1a: Giải quyết vấn đề kỹ thuật.
- 5.2.NC1a/b: Xác định nhu cầu và giải pháp công nghệ (Ví dụ: Dùng phần mềm Toán học như GeoGebra, Desmos, máy tính cầm tay để giải toán/vẽ đồ thị).
- 5.3.NC1b: Sử dụng sáng tạo công nghệ để giải quyết vấn đề khái niệm/trừu tượng.

6. TRÍ TUỆ NHÂN TẠO (AI)
- 6.1.NC1a: Phân tích cách AI hoạt động.
- 6.2.NC1a: Sử dụng ứng dụng AI để giải quyết vấn đề cụ thể.

LƯU Ý ĐẶC THÙ MÔN TOÁN (Tham khảo Phụ lục):
- Sử dụng GeoGebra/Desmos để vẽ đồ thị/hình học: Thường là 5.2.NC1b hoặc 3.1.NC1a.
- Sử dụng Excel/Bảng tính để thống kê: Thường là 1.3.NC1b hoặc 5.2.NC1b.
- Sử dụng Máy tính cầm tay (MTCT) để tính toán: 5.2.NC1b.
- Tìm kiếm thông tin/dữ liệu thực tế: 1.1.NC1b."#
}

fn role() -> &'static str {
r#"Bạn là chuyên gia giáo dục về **Khung năng lực số (Digital Competence Framework)** theo hướng dẫn của **Công văn 3456/BGDĐT-GDPT** tại Việt Nam.

Nhiệm vụ: Thiết kế kế hoạch tích hợp năng lực số vào bài dạy."#
}

fn structure_label(mode: StructureMode) -> &'static str {
    match mode {
        StructureMode::ByPeriod => "Chia cụ thể từng tiết",
        StructureMode::ByTopic => "Soạn theo bài (Chuỗi hoạt động liên mạch)",
    }
}

fn structure_note(mode: StructureMode) -> &'static str {
    match mode {
        StructureMode::ByPeriod => "*(Lưu ý: Hãy chia rõ Tiết 1, Tiết 2... nếu số tiết > 1)*",
        StructureMode::ByTopic => "*(Lưu ý: Soạn thành một chuỗi hoạt động liền mạch, không chia theo tiết)*",
    }
}

/// Output skeleton the model must follow, heading for heading.
fn output_format(req: &LessonRequest) -> String {
    format!(
r#"YÊU CẦU ĐẦU RA (Định dạng Markdown):

# KẾ HOẠCH BÀI DẠY TÍCH HỢP NĂNG LỰC SỐ (Bộ sách: {book})

## 1. Mục tiêu Năng lực số (Theo CV 3456)
*(Liệt kê cụ thể các mã năng lực sẽ đạt được. Ví dụ: **5.2.NC1b**: Sử dụng GeoGebra để vẽ đồ thị)*
- **[Mã NC]**: [Mô tả hành vi cụ thể của học sinh trong bài này]
- ...

## 2. Thiết bị và Học liệu số
- Phần mềm/Công cụ: (Ví dụ: GeoGebra, Padlet, Canva, Google Sheets...)
- Thiết bị: (Máy tính, điện thoại, máy chiếu...)

## 3. Tiến trình dạy học (Chi tiết các hoạt động)

{note}

### Hoạt động 1: Khởi động (Tích hợp số)
- **Mục tiêu**: ...
- **Cách thức**: Mô tả cách dùng công nghệ để gây hứng thú.

### Hoạt động 2: Hình thành kiến thức (Trọng tâm)
- **Hoạt động của GV & HS**: ...
- **Ứng dụng công nghệ**: Mô tả chi tiết HS dùng công cụ gì (Ví dụ: Dùng GeoGebra trượt tham số a, b để quan sát biến thiên).
- **Mã năng lực số tương ứng**: [Điền mã NC phù hợp, ví dụ 5.2.NC1b]

### Hoạt động 3: Luyện tập & Vận dụng
- **Bài tập thực hành**: ...
- **Sản phẩm số**: (Ví dụ: File báo cáo, Link bảng tin, Video...)

## 4. Kiểm tra & Đánh giá
- Cách đánh giá năng lực số của HS trong bài này."#,
        book = req.textbook_edition,
        note = structure_note(req.structure_mode),
    )
}

/// Builds the single instruction string sent alongside any attachment.
pub fn build_instruction(req: &LessonRequest) -> String {
    let topic = req
        .topic_title
        .as_deref()
        .unwrap_or("(Chưa nhập, hãy xác định từ tài liệu đính kèm)");

    let mut out = String::with_capacity(6_000);
    out.push_str(role());
    out.push_str("\n\nTHÔNG TIN BÀI DẠY:\n");
    out.push_str(&format!("- Bộ sách: {}\n", req.textbook_edition));
    out.push_str(&format!("- Môn: {}\n", req.subject_name));
    out.push_str(&format!("- Lớp: {}\n", req.grade));
    out.push_str(&format!("- Chủ đề/Bài học: {}\n", topic));
    out.push_str(&format!("- Thời lượng: {} tiết\n", req.total_periods));
    out.push_str(&format!("- Cấu trúc soạn thảo: {}\n", structure_label(req.structure_mode)));

    out.push_str("\nTHAM CHIẾU KHUNG NĂNG LỰC SỐ (Bắt buộc sử dụng mã NC):\n");
    out.push_str(competency_framework());
    out.push_str("\n\n");
    out.push_str(&output_format(req));

    out.push_str(&format!(
        "\n\nHãy tư duy sư phạm, bám sát nội dung Môn {} {} và đặc trưng của bộ sách {}. Ưu tiên các phần mềm mã nguồn mở hoặc phổ biến tại Việt Nam.",
        req.subject_name, req.grade, req.textbook_edition
    ));

    if req.attachment.is_some() {
        out.push_str("\n\nLƯU Ý QUAN TRỌNG: Hãy phân tích nội dung từ file hình ảnh/PDF đính kèm để soạn bài sát với sách giáo khoa.");
    }
    out
}
